/// Postgres-backed credential store
///
/// There is exactly one administrative row; updates target the oldest row
/// in `users` rather than looking it up by name.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::auth::{CredentialStore, Identity};
use crate::error::AppError;

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, AppError> {
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(username, password_hash)| Identity {
            username,
            password_hash,
        }))
    }

    async fn update_admin(&self, username: &str, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $1, password_hash = $2, updated_at = $3
            WHERE id = (SELECT id FROM users ORDER BY id LIMIT 1)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() < 1 {
            return Err(AppError::Internal(
                "No administrator identity to update".to_string(),
            ));
        }

        Ok(())
    }

    async fn create_admin_if_absent(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at, updated_at)
            SELECT $1, $2, $3, $3
            WHERE NOT EXISTS (SELECT 1 FROM users)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
