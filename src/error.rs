use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Unified error type for all handlers and repos.
///
/// Everything a request can fail with maps onto one of these variants; the
/// `IntoResponse` impl decides status code and body. Internal faults keep
/// their context for the logs but never leak detail to the caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("username already taken")]
    DuplicateUsername,
    #[error("transaction reference already exists")]
    DuplicateTransaction,
    #[error("missing Authorization header")]
    Unauthenticated,
    #[error("invalid Authorization header")]
    MalformedCredential,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    ExpiredToken,
    #[error("admin role required")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("storage unavailable, retry later")]
    Unavailable,
    #[error("database error")]
    Database(#[source] sqlx::Error),
    #[error("password hash error")]
    PasswordHash(argon2::password_hash::Error),
    #[error("token error")]
    Jwt(#[source] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::Unauthenticated
            | AppError::MalformedCredential
            | AppError::InvalidToken
            | AppError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::DuplicateUsername | AppError::DuplicateTransaction => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::PasswordHash(_) | AppError::Jwt(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("record"),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::Unavailable
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let constraint = db_err.constraint().unwrap_or_default().to_string();
                if constraint.contains("username") {
                    AppError::DuplicateUsername
                } else if constraint.contains("transaction_id") {
                    AppError::DuplicateTransaction
                } else {
                    AppError::Database(sqlx::Error::Database(db_err))
                }
            }
            other => AppError::Database(other),
        }
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AppError::PasswordHash(err)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => AppError::ExpiredToken,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidToken
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::ImmatureSignature
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => AppError::InvalidToken,
            _ => AppError::Jwt(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::Validation { field, message } => {
                json!({ "error": message, "field": field })
            }
            AppError::Database(e) => {
                error!(error = %e, "database error");
                json!({ "error": "internal server error" })
            }
            AppError::PasswordHash(e) => {
                error!(error = %e, "password hash error");
                json!({ "error": "internal server error" })
            }
            AppError::Jwt(e) => {
                error!(error = %e, "jwt error");
                json!({ "error": "internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::validation("amount", "must be positive").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::MalformedCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::ExpiredToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::DuplicateUsername.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("payment").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn pool_timeout_maps_to_unavailable() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Unavailable));
    }

    #[test]
    fn not_found_message_names_the_resource() {
        assert_eq!(AppError::NotFound("payment").to_string(), "payment not found");
    }
}
