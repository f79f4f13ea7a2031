/// Article persistence
///
/// Articles are soft-deleted: `deleted_at` is set and every read filters on
/// it. Tag associations live in `article_tags`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{sqlstate, AppError, ContentError, FOREIGN_KEY_VIOLATION};
use crate::store::tags::Tag;
use crate::store::Pagination;

/// Validated article fields for insert and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub desc: String,
    pub content: String,
    pub img: String,
    pub tag_ids: Vec<i64>,
}

/// List entry: everything except the body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub desc: String,
    pub img: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tag: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub desc: String,
    pub content: String,
    pub img: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tag: Vec<Tag>,
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: i64,
    title: String,
    description: String,
    img: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: i64,
    title: String,
    description: String,
    content: String,
    img: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub async fn insert_article(pool: &PgPool, draft: &ArticleDraft) -> Result<i64, AppError> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO articles (title, description, content, img, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id
        "#,
    )
    .bind(&draft.title)
    .bind(&draft.desc)
    .bind(&draft.content)
    .bind(&draft.img)
    .bind(now)
    .fetch_one(&mut tx)
    .await?;

    attach_tags(&mut tx, id, &draft.tag_ids).await?;
    tx.commit().await?;

    Ok(id)
}

/// Update an article.
///
/// An empty `desc` or `img` keeps the stored value. Tags are replaced only
/// when the draft names at least one.
pub async fn update_article(pool: &PgPool, id: i64, draft: &ArticleDraft) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE articles
        SET title = $1,
            content = $2,
            description = CASE WHEN $3 = '' THEN description ELSE $3 END,
            img = CASE WHEN $4 = '' THEN img ELSE $4 END,
            updated_at = $5
        WHERE id = $6 AND deleted_at IS NULL
        "#,
    )
    .bind(&draft.title)
    .bind(&draft.content)
    .bind(&draft.desc)
    .bind(&draft.img)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut tx)
    .await?;

    if result.rows_affected() < 1 {
        return Err(ContentError::ArticleNotFound.into());
    }

    if !draft.tag_ids.is_empty() {
        sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
            .bind(id)
            .execute(&mut tx)
            .await?;
        attach_tags(&mut tx, id, &draft.tag_ids).await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Soft-delete an article and drop its tag associations
pub async fn delete_article(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "UPDATE articles SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL",
    )
    .bind(Utc::now())
    .bind(id)
    .execute(&mut tx)
    .await?;

    if result.rows_affected() < 1 {
        return Err(ContentError::ArticleNotFound.into());
    }

    sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
        .bind(id)
        .execute(&mut tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Newest first, plus the total number of live articles
pub async fn list_articles(
    pool: &PgPool,
    page: Pagination,
) -> Result<(Vec<ArticleSummary>, i64), AppError> {
    let rows = sqlx::query_as::<_, SummaryRow>(
        r#"
        SELECT id, title, description, img, created_at, updated_at
        FROM articles
        WHERE deleted_at IS NULL
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    let total =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM articles WHERE deleted_at IS NULL")
            .fetch_one(pool)
            .await?;

    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut tags = tags_by_article(pool, &ids).await?;

    let articles = rows
        .into_iter()
        .map(|row| ArticleSummary {
            tag: tags.remove(&row.id).unwrap_or_default(),
            id: row.id,
            title: row.title,
            desc: row.description,
            img: row.img,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .collect();

    Ok((articles, total))
}

pub async fn get_article(pool: &PgPool, id: i64) -> Result<Article, AppError> {
    let row = sqlx::query_as::<_, ArticleRow>(
        r#"
        SELECT id, title, description, content, img, created_at, updated_at
        FROM articles
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(ContentError::ArticleNotFound)?;

    let mut tags = tags_by_article(pool, &[row.id]).await?;

    Ok(Article {
        tag: tags.remove(&row.id).unwrap_or_default(),
        id: row.id,
        title: row.title,
        desc: row.description,
        content: row.content,
        img: row.img,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

async fn attach_tags(
    tx: &mut Transaction<'_, Postgres>,
    article_id: i64,
    tag_ids: &[i64],
) -> Result<(), AppError> {
    if tag_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO article_tags (article_id, tag_id)
        SELECT $1, tag_id FROM UNNEST($2::BIGINT[]) AS tag_id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(article_id)
    .bind(tag_ids)
    .execute(&mut *tx)
    .await
    .map_err(|err| {
        if sqlstate(&err).as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            ContentError::TagNotFound.into()
        } else {
            AppError::from(err)
        }
    })?;

    Ok(())
}

async fn tags_by_article(
    pool: &PgPool,
    article_ids: &[i64],
) -> Result<HashMap<i64, Vec<Tag>>, AppError> {
    if article_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, (i64, i64, String)>(
        r#"
        SELECT atg.article_id, t.id, t.name
        FROM article_tags atg
        JOIN tags t ON t.id = atg.tag_id
        WHERE atg.article_id = ANY($1)
        ORDER BY t.id
        "#,
    )
    .bind(article_ids)
    .fetch_all(pool)
    .await?;

    let mut tags: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (article_id, id, name) in rows {
        tags.entry(article_id).or_default().push(Tag { id, name });
    }
    Ok(tags)
}
