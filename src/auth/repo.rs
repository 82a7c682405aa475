use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::{Role, User};
use crate::error::AppError;

impl User {
    /// Find a user by username. Lookup is case-sensitive.
    pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, role, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user. The password must already be hashed; a unique
    /// violation on the username surfaces as `DuplicateUsername`.
    pub async fn create(
        db: &PgPool,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
        role: Role,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, email, role, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .bind(role)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Overwrite the stored hash. Returns `NotFound` if the user id is
    /// unknown.
    pub async fn reset_password(
        db: &PgPool,
        id: Uuid,
        new_password_hash: &str,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(new_password_hash)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("user"));
        }
        Ok(())
    }
}
