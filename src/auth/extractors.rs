use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo_types::Role;
use crate::error::AppError;

/// Verified caller identity, resolved from the bearer token. This is the
/// only source of ownership information downstream; handlers never accept
/// a client-supplied owner.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(AppError::MalformedCredential)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token)?;

        Ok(Identity {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::User;
    use crate::state::AppState;
    use axum::http::Request;
    use time::{Duration, OffsetDateTime};

    fn parts_with_auth(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/payments");
        if let Some(value) = header {
            builder = builder.header(axum::http::header::AUTHORIZATION, value);
        }
        let (parts, _) = builder.body(()).expect("request builds").into_parts();
        parts
    }

    fn make_user() -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            username: "bob".into(),
            password_hash: "x".into(),
            email: None,
            role: Role::Viewer,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(None);
        let err = Identity::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn wrong_scheme_is_malformed() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        let err = Identity::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedCredential));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Bearer garbage"));
        let err = Identity::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn expired_token_is_rejected_distinctly() {
        let state = AppState::fake();
        let mut expired_signer = JwtKeys::from_ref(&state);
        expired_signer.ttl = Duration::minutes(-5);
        let token = expired_signer.sign(&make_user()).expect("sign");

        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let err = Identity::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExpiredToken));
    }

    #[tokio::test]
    async fn valid_token_resolves_identity() {
        let state = AppState::fake();
        let user = make_user();
        let token = JwtKeys::from_ref(&state).sign(&user).expect("sign");

        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let identity = Identity::from_request_parts(&mut parts, &state)
            .await
            .expect("extract identity");
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.username, "bob");
        assert_eq!(identity.role, Role::Viewer);
    }
}
