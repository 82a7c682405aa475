use axum::{
    extract::{FromRef, Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, ResetPasswordRequest},
        extractors::Identity,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::{Role, User},
        services::{is_valid_email, is_valid_username},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/users/:id/reset-password", post(reset_password))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.username = payload.username.trim().to_string();

    if !is_valid_username(&payload.username) {
        warn!(username = %payload.username, "invalid username");
        return Err(AppError::validation(
            "username",
            "username must be 3-32 characters of letters, digits, '_', '.' or '-'",
        ));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(AppError::validation(
            "password",
            "password must be at least 8 characters",
        ));
    }

    if let Some(email) = payload.email.as_deref() {
        if !is_valid_email(email) {
            warn!("invalid email");
            return Err(AppError::validation("email", "invalid email address"));
        }
    }

    // Ensure the username is not taken; the unique constraint backstops
    // races and maps to the same error.
    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(AppError::DuplicateUsername);
    }

    let hash = hash_password(&payload.password)?;
    let role = payload.role.unwrap_or(Role::Viewer);
    let user = User::create(
        &state.db,
        &payload.username,
        &hash,
        payload.email.as_deref(),
        role,
    )
    .await?;

    let token = JwtKeys::from_ref(&state).sign(&user)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = match User::find_by_username(&state.db, &payload.username).await? {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(username = %payload.username, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(&state).sign(&user)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::find_by_id(&state.db, identity.user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    Ok(Json(user.into()))
}

/// Explicit, audited password reset. Replaces the old implicit reset of a
/// well-known admin account at startup; only an admin may invoke it, and
/// the acting admin is recorded in the log.
#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    identity: Identity,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if identity.role != Role::Admin {
        warn!(actor = %identity.user_id, target = %user_id, "non-admin password reset attempt");
        return Err(AppError::Forbidden);
    }

    if payload.new_password.len() < 8 {
        return Err(AppError::validation(
            "new_password",
            "password must be at least 8 characters",
        ));
    }

    let hash = hash_password(&payload.new_password)?;
    User::reset_password(&state.db, user_id, &hash).await?;

    info!(actor = %identity.user_id, actor_username = %identity.username, target = %user_id, "password reset by admin");
    Ok(Json(serde_json::json!({ "status": "password reset" })))
}
