use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::auth::repo_types::User;
use crate::config::JwtConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Process-wide signing material, derived once from config. The secret is
/// injected at startup and never comes from request data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::minutes(ttl_minutes),
        }
    }
}

impl JwtKeys {
    /// Sign a claim set for the given user: subject, username and role,
    /// expiring `ttl` from now.
    pub fn sign(&self, user: &User) -> Result<String, AppError> {
        let now = OffsetDateTime::now_utc();
        let exp = now + self.ttl;
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "jwt signed");
        Ok(token)
    }

    /// Verify signature, issuer, audience and expiry. Signature problems
    /// surface as `InvalidToken` without the claims ever being trusted;
    /// a good signature past its expiry surfaces as `ExpiredToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::Role;
    use uuid::Uuid;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    fn make_user(role: Role) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            password_hash: "x".into(),
            email: None,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let user = make_user(Role::Admin);
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let mut expired = make_keys();
        expired.ttl = Duration::minutes(-5);
        let token = expired.sign(&make_user(Role::Viewer)).expect("sign");

        let err = make_keys().verify(&token).unwrap_err();
        assert!(matches!(err, AppError::ExpiredToken));
    }

    #[tokio::test]
    async fn verify_rejects_tampered_token() {
        let keys = make_keys();
        let token = keys.sign(&make_user(Role::Viewer)).expect("sign");
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

        let err = keys.verify(&tampered).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn verify_rejects_garbage() {
        let err = make_keys().verify("not-a-jwt").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn verify_rejects_foreign_secret() {
        let state = AppState::fake();
        let mut foreign = JwtKeys::from_ref(&state);
        foreign.encoding = EncodingKey::from_secret(b"other-secret");
        let token = foreign.sign(&make_user(Role::Viewer)).expect("sign");

        let err = JwtKeys::from_ref(&state).verify(&token).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}
