use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    BankTransfer,
    Paypal,
    Upi,
    Crypto,
}

/// Status is fixed at creation time; the field is kept for future
/// transition support but no transition endpoint exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

/// Payment record in the ledger. `amount` is immutable after creation and
/// `user_id` is always the authenticated creator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub amount: Decimal,
    pub receiver: String,
    pub method: PaymentMethod,
    pub description: Option<String>,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"credit_card\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"bank_transfer\""
        );
        assert_eq!(serde_json::to_string(&PaymentMethod::Upi).unwrap(), "\"upi\"");
    }

    #[test]
    fn status_roundtrips() {
        let status: PaymentStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(status, PaymentStatus::Failed);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"failed\"");
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        assert!(serde_json::from_str::<PaymentMethod>("\"cheque\"").is_err());
        assert!(serde_json::from_str::<PaymentStatus>("\"cancelled\"").is_err());
    }
}
