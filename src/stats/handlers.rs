use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractors::Identity, error::AppError, state::AppState, stats::dto::StatsResponse,
    stats::repo,
};

const TREND_DAYS: i64 = 7;

pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/payments/stats", get(get_stats))
}

#[instrument(skip(state, _identity))]
pub async fn get_stats(
    State(state): State<AppState>,
    _identity: Identity,
) -> Result<Json<StatsResponse>, AppError> {
    let summary = repo::summary(&state.db).await?;
    let revenue_trend = repo::trend(&state.db, TREND_DAYS).await?;
    let by_method = repo::by_method(&state.db).await?;

    Ok(Json(StatsResponse::assemble(
        summary,
        revenue_trend,
        by_method,
    )))
}
