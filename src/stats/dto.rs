use rust_decimal::Decimal;
use serde::Serialize;

use crate::payments::repo_types::PaymentMethod;

/// Headline numbers over the whole ledger. `total_revenue` sums every
/// record regardless of status, pending and failed included; it is a raw
/// ledger total, not recognized revenue.
#[derive(Debug, Serialize)]
pub struct StatsSummary {
    pub total_revenue: Decimal,
    pub failed_count: i64,
    pub today_count: i64,
    pub this_week_count: i64,
}

/// One calendar-day revenue bucket.
#[derive(Debug, Serialize)]
pub struct TrendPoint {
    pub date: String, // YYYY-MM-DD
    pub revenue: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MethodCount {
    pub method: PaymentMethod,
    pub count: i64,
}

/// Full response of GET /payments/stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_revenue: Decimal,
    pub failed_count: i64,
    pub today_count: i64,
    pub this_week_count: i64,
    pub revenue_trend: Vec<TrendPoint>,
    pub by_method: Vec<MethodCount>,
}

impl StatsResponse {
    pub fn assemble(
        summary: StatsSummary,
        revenue_trend: Vec<TrendPoint>,
        by_method: Vec<MethodCount>,
    ) -> Self {
        Self {
            total_revenue: summary.total_revenue,
            failed_count: summary.failed_count,
            today_count: summary.today_count,
            this_week_count: summary.this_week_count,
            revenue_trend,
            by_method,
        }
    }
}
