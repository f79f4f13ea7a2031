/// Tag persistence

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{sqlstate, AppError, ContentError, UNIQUE_VIOLATION};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Tag as listed in the admin panel, with the number of live articles using it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagUsage {
    pub id: i64,
    pub name: String,
    pub article_count: i64,
}

fn map_unique(err: sqlx::Error) -> AppError {
    if sqlstate(&err).as_deref() == Some(UNIQUE_VIOLATION) {
        ContentError::TagExists.into()
    } else {
        err.into()
    }
}

pub async fn insert_tag(pool: &PgPool, name: &str) -> Result<Tag, AppError> {
    sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(map_unique)
}

pub async fn update_tag(pool: &PgPool, id: i64, name: &str) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE tags SET name = $1 WHERE id = $2")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await
        .map_err(map_unique)?;

    if result.rows_affected() < 1 {
        return Err(ContentError::TagNotFound.into());
    }
    Ok(())
}

/// Delete a tag; its article associations go with it (`ON DELETE CASCADE`)
pub async fn delete_tag(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() < 1 {
        return Err(ContentError::TagNotFound.into());
    }
    Ok(())
}

pub async fn list_tags(pool: &PgPool) -> Result<Vec<TagUsage>, AppError> {
    let tags = sqlx::query_as::<_, TagUsage>(
        r#"
        SELECT t.id, t.name, COUNT(a.id) AS article_count
        FROM tags t
        LEFT JOIN article_tags atg ON atg.tag_id = t.id
        LEFT JOIN articles a ON a.id = atg.article_id AND a.deleted_at IS NULL
        GROUP BY t.id, t.name
        ORDER BY t.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tags)
}
