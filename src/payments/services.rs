use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::extractors::Identity;
use crate::error::AppError;
use crate::payments::dto::CreatePaymentRequest;
use crate::payments::repo::{self, NewPayment};
use crate::payments::repo_types::{Payment, PaymentStatus};

pub(crate) fn validate(req: &CreatePaymentRequest) -> Result<(), AppError> {
    if req.amount <= Decimal::ZERO {
        return Err(AppError::validation(
            "amount",
            "amount must be greater than zero",
        ));
    }
    if req.receiver.trim().is_empty() {
        return Err(AppError::validation("receiver", "receiver must not be empty"));
    }
    if let Some(transaction_id) = req.transaction_id.as_deref() {
        if transaction_id.trim().is_empty() {
            return Err(AppError::validation(
                "transaction_id",
                "transaction_id must not be empty when given",
            ));
        }
    }
    Ok(())
}

pub(crate) fn new_transaction_id() -> String {
    format!("txn_{}", Uuid::new_v4())
}

/// Validate and persist a payment. The owner is always the authenticated
/// caller; a missing transaction reference gets a generated one.
pub async fn create_payment(
    db: &PgPool,
    identity: &Identity,
    req: CreatePaymentRequest,
) -> Result<Payment, AppError> {
    validate(&req)?;

    let transaction_id = req
        .transaction_id
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(new_transaction_id);

    repo::insert(
        db,
        NewPayment {
            amount: req.amount,
            receiver: req.receiver,
            method: req.method,
            description: req.description,
            status: req.status.unwrap_or(PaymentStatus::Pending),
            transaction_id,
            user_id: identity.user_id,
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::repo_types::PaymentMethod;

    fn request(amount: &str, receiver: &str) -> CreatePaymentRequest {
        CreatePaymentRequest {
            amount: amount.parse().unwrap(),
            receiver: receiver.into(),
            method: PaymentMethod::Upi,
            description: None,
            status: None,
            transaction_id: None,
        }
    }

    #[test]
    fn accepts_a_valid_request() {
        assert!(validate(&request("10.00", "acme-store")).is_ok());
    }

    #[test]
    fn rejects_zero_amount() {
        let err = validate(&request("0", "acme-store")).unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "amount", .. }));
    }

    #[test]
    fn rejects_negative_amount() {
        let err = validate(&request("-5.00", "acme-store")).unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "amount", .. }));
    }

    #[test]
    fn rejects_blank_receiver() {
        let err = validate(&request("10.00", "   ")).unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "receiver", .. }));
    }

    #[test]
    fn rejects_blank_transaction_id() {
        let mut req = request("10.00", "acme-store");
        req.transaction_id = Some("  ".into());
        let err = validate(&req).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation {
                field: "transaction_id",
                ..
            }
        ));
    }

    #[test]
    fn generated_references_are_unique_and_prefixed() {
        let a = new_transaction_id();
        let b = new_transaction_id();
        assert!(a.starts_with("txn_"));
        assert_ne!(a, b);
        // txn_ prefix plus a hyphenated UUID
        assert_eq!(a.len(), 4 + 36);
    }
}
