use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::error::AppError;
use crate::payments::repo_types::{Payment, PaymentMethod, PaymentStatus};

/// Request body for creating a payment. Ownership is not part of the
/// body; it always comes from the verified identity.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: Decimal,
    pub receiver: String,
    pub method: PaymentMethod,
    pub description: Option<String>,
    pub status: Option<PaymentStatus>,
    pub transaction_id: Option<String>,
}

/// Raw query string for GET /payments. Validation and date parsing happen
/// in one place, `into_filters`.
#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    pub status: Option<PaymentStatus>,
    pub method: Option<PaymentMethod>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    10
}

/// Validated listing parameters. `until` is exclusive: a `date_to` of
/// 2026-08-06 covers the whole of that calendar day.
#[derive(Debug, Clone)]
pub struct ListFilters {
    pub status: Option<PaymentStatus>,
    pub method: Option<PaymentMethod>,
    pub from: Option<OffsetDateTime>,
    pub until: Option<OffsetDateTime>,
    pub page: i64,
    pub limit: i64,
}

impl ListFilters {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

const MAX_LIMIT: i64 = 100;

fn parse_date(value: &str, field: &'static str) -> Result<Date, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format)
        .map_err(|_| AppError::validation(field, "expected a YYYY-MM-DD date"))
}

impl ListPaymentsQuery {
    pub fn into_filters(self) -> Result<ListFilters, AppError> {
        let from = self
            .date_from
            .as_deref()
            .map(|v| parse_date(v, "date_from"))
            .transpose()?
            .map(|d| d.midnight().assume_utc());

        let until = self
            .date_to
            .as_deref()
            .map(|v| parse_date(v, "date_to"))
            .transpose()?
            .map(|d| d.midnight().assume_utc() + Duration::days(1));

        if let (Some(from), Some(until)) = (from, until) {
            if from >= until {
                return Err(AppError::validation(
                    "date_to",
                    "date_to must not precede date_from",
                ));
            }
        }

        Ok(ListFilters {
            status: self.status,
            method: self.method,
            from,
            until,
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_LIMIT),
        })
    }
}

/// One page of the ledger, newest first.
#[derive(Debug, Serialize)]
pub struct PaymentPage {
    pub data: Vec<Payment>,
    pub page: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

impl PaymentPage {
    pub fn new(data: Vec<Payment>, page: i64, limit: i64, total_items: i64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + limit - 1) / limit
        };
        Self {
            data,
            page,
            total_pages,
            total_items,
        }
    }
}
