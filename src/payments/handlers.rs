use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::Identity,
    error::AppError,
    payments::dto::{CreatePaymentRequest, ListPaymentsQuery, PaymentPage},
    payments::repo,
    payments::repo_types::Payment,
    payments::services::create_payment,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments))
        .route("/payments/my-payments", get(my_payments))
        .route("/payments/:id", get(get_payment))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/payments", post(create))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payment = create_payment(&state.db, &identity, payload).await?;

    info!(
        payment_id = %payment.id,
        user_id = %identity.user_id,
        transaction_id = %payment.transaction_id,
        "payment created"
    );
    Ok((StatusCode::CREATED, Json(payment)))
}

#[instrument(skip(state, _identity))]
pub async fn list_payments(
    State(state): State<AppState>,
    _identity: Identity,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<Json<PaymentPage>, AppError> {
    let filters = query.into_filters()?;
    let (data, total_items) = repo::list(&state.db, &filters).await?;
    Ok(Json(PaymentPage::new(
        data,
        filters.page,
        filters.limit,
        total_items,
    )))
}

#[instrument(skip(state))]
pub async fn my_payments(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Payment>>, AppError> {
    let payments = repo::list_by_owner(&state.db, identity.user_id).await?;
    Ok(Json(payments))
}

#[instrument(skip(state, _identity))]
pub async fn get_payment(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<Payment>, AppError> {
    let payment = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("payment"))?;
    Ok(Json(payment))
}
