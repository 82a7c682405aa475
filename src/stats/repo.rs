use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::AppError;
use crate::payments::repo_types::PaymentMethod;
use crate::stats::dto::{MethodCount, StatsSummary, TrendPoint};

/// Headline aggregates in a single statement, so each number reflects one
/// snapshot of the ledger. "Today" is the current calendar day in the
/// database server's local time; "this week" is a trailing 7-day window.
pub async fn summary(db: &PgPool) -> Result<StatsSummary, AppError> {
    let (total_revenue, failed_count, today_count, this_week_count): (Decimal, i64, i64, i64) =
        sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount), 0)                                        AS total_revenue,
                   COUNT(*) FILTER (WHERE status = 'failed')                       AS failed_count,
                   COUNT(*) FILTER (WHERE created_at::date = CURRENT_DATE)         AS today_count,
                   COUNT(*) FILTER (WHERE created_at >= now() - INTERVAL '7 days') AS this_week_count
            FROM payments
            "#,
        )
        .fetch_one(db)
        .await?;

    Ok(StatsSummary {
        total_revenue,
        failed_count,
        today_count,
        this_week_count,
    })
}

/// Revenue per calendar day over the trailing window, oldest first. Days
/// with no records are present with revenue 0.
pub async fn trend(db: &PgPool, days: i64) -> Result<Vec<TrendPoint>, AppError> {
    let rows: Vec<(String, Decimal)> = sqlx::query_as(
        r#"
        SELECT to_char(d.day, 'YYYY-MM-DD')  AS date,
               COALESCE(SUM(p.amount), 0)    AS revenue
        FROM generate_series(
                 CURRENT_DATE - ($1::int - 1) * INTERVAL '1 day',
                 CURRENT_DATE,
                 INTERVAL '1 day'
             ) AS d(day)
        LEFT JOIN payments p ON p.created_at::date = d.day::date
        GROUP BY d.day
        ORDER BY d.day
        "#,
    )
    .bind(days)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(date, revenue)| TrendPoint { date, revenue })
        .collect())
}

/// Payment count per method, one row per method present in the ledger.
pub async fn by_method(db: &PgPool) -> Result<Vec<MethodCount>, AppError> {
    let rows: Vec<(PaymentMethod, i64)> = sqlx::query_as(
        r#"
        SELECT method, COUNT(*) AS count
        FROM payments
        GROUP BY method
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(method, count)| MethodCount { method, count })
        .collect())
}
