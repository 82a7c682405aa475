use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::payments::dto::ListFilters;
use crate::payments::repo_types::{Payment, PaymentMethod, PaymentStatus};

const PAYMENT_COLUMNS: &str =
    "id, amount, receiver, method, description, status, transaction_id, user_id, created_at, updated_at";

pub struct NewPayment {
    pub amount: Decimal,
    pub receiver: String,
    pub method: PaymentMethod,
    pub description: Option<String>,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub user_id: Uuid,
}

pub async fn insert(db: &PgPool, new: NewPayment) -> Result<Payment, AppError> {
    let payment = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (amount, receiver, method, description, status, transaction_id, user_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, amount, receiver, method, description, status, transaction_id, user_id, created_at, updated_at
        "#,
    )
    .bind(new.amount)
    .bind(&new.receiver)
    .bind(new.method)
    .bind(&new.description)
    .bind(new.status)
    .bind(&new.transaction_id)
    .bind(new.user_id)
    .fetch_one(db)
    .await?;
    Ok(payment)
}

/// Filtered, paginated listing, newest first. The `id` tiebreaker keeps
/// pagination stable for records created in the same instant.
pub async fn list(db: &PgPool, filters: &ListFilters) -> Result<(Vec<Payment>, i64), AppError> {
    let rows = sqlx::query_as::<_, Payment>(&format!(
        r#"
        SELECT {PAYMENT_COLUMNS}
        FROM payments
        WHERE ($1::payment_status IS NULL OR status = $1)
          AND ($2::payment_method IS NULL OR method = $2)
          AND ($3::timestamptz IS NULL OR created_at >= $3)
          AND ($4::timestamptz IS NULL OR created_at < $4)
        ORDER BY created_at DESC, id DESC
        LIMIT $5 OFFSET $6
        "#
    ))
    .bind(filters.status)
    .bind(filters.method)
    .bind(filters.from)
    .bind(filters.until)
    .bind(filters.limit)
    .bind(filters.offset())
    .fetch_all(db)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM payments
        WHERE ($1::payment_status IS NULL OR status = $1)
          AND ($2::payment_method IS NULL OR method = $2)
          AND ($3::timestamptz IS NULL OR created_at >= $3)
          AND ($4::timestamptz IS NULL OR created_at < $4)
        "#,
    )
    .bind(filters.status)
    .bind(filters.method)
    .bind(filters.from)
    .bind(filters.until)
    .fetch_one(db)
    .await?;

    Ok((rows, total))
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Payment>, AppError> {
    let payment = sqlx::query_as::<_, Payment>(&format!(
        r#"
        SELECT {PAYMENT_COLUMNS}
        FROM payments
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(payment)
}

pub async fn list_by_owner(db: &PgPool, user_id: Uuid) -> Result<Vec<Payment>, AppError> {
    let rows = sqlx::query_as::<_, Payment>(&format!(
        r#"
        SELECT {PAYMENT_COLUMNS}
        FROM payments
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
