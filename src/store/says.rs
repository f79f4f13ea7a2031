/// Short "say" posts, soft-deleted like articles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, ContentError};
use crate::store::Pagination;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Say {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn insert_say(pool: &PgPool, content: &str) -> Result<Say, AppError> {
    let say = sqlx::query_as::<_, Say>(
        r#"
        INSERT INTO says (content, created_at, updated_at)
        VALUES ($1, $2, $2)
        RETURNING id, content, created_at, updated_at
        "#,
    )
    .bind(content)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(say)
}

pub async fn update_say(pool: &PgPool, id: i64, content: &str) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE says SET content = $1, updated_at = $2 WHERE id = $3 AND deleted_at IS NULL",
    )
    .bind(content)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() < 1 {
        return Err(ContentError::SayNotFound.into());
    }
    Ok(())
}

pub async fn delete_say(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let result =
        sqlx::query("UPDATE says SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL")
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

    if result.rows_affected() < 1 {
        return Err(ContentError::SayNotFound.into());
    }
    Ok(())
}

pub async fn list_says(pool: &PgPool, page: Pagination) -> Result<(Vec<Say>, i64), AppError> {
    let says = sqlx::query_as::<_, Say>(
        r#"
        SELECT id, content, created_at, updated_at
        FROM says
        WHERE deleted_at IS NULL
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM says WHERE deleted_at IS NULL")
        .fetch_one(pool)
        .await?;

    Ok((says, total))
}
