/// Article Routes
///
/// Public reads (`/articles`, `/article/{id}`) and gated writes under
/// `/admin/article`.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::store::articles::{self, ArticleDraft, ArticleSummary};
use crate::store::{PageQuery, Pagination};
use crate::validators::{validate_content, validate_desc, validate_img, validate_title};

use super::Envelope;

#[derive(Deserialize)]
pub struct ArticleRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub img: String,
    /// Tag ids
    #[serde(default)]
    pub tag: Vec<i64>,
}

impl TryFrom<ArticleRequest> for ArticleDraft {
    type Error = AppError;

    fn try_from(req: ArticleRequest) -> Result<Self, Self::Error> {
        let title = validate_title(&req.title)?;
        validate_desc(&req.desc)?;
        validate_content(&req.content)?;
        validate_img(&req.img)?;

        let mut tag_ids = req.tag;
        tag_ids.sort_unstable();
        tag_ids.dedup();

        Ok(ArticleDraft {
            title,
            desc: req.desc,
            content: req.content,
            img: req.img,
            tag_ids,
        })
    }
}

#[derive(Serialize)]
struct Created {
    id: i64,
}

/// One page of `/articles`, keyed the way the blog front end reads it
#[derive(Serialize)]
pub struct ArticlePage {
    pub articles: Vec<ArticleSummary>,
    pub total: i64,
}

/// POST /admin/article
pub async fn add_article(
    form: web::Json<ArticleRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let draft = ArticleDraft::try_from(form.into_inner())?;
    let id = articles::insert_article(pool.get_ref(), &draft).await?;

    tracing::info!(article_id = id, title = %draft.title, "Article created");
    Ok(HttpResponse::Created().json(Envelope::ok(Created { id })))
}

/// PUT /admin/article/{id}
///
/// Empty `desc`/`img` keep the stored values; an empty `tag` list keeps the
/// current tags.
pub async fn update_article(
    path: web::Path<i64>,
    form: web::Json<ArticleRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let draft = ArticleDraft::try_from(form.into_inner())?;
    articles::update_article(pool.get_ref(), id, &draft).await?;

    tracing::info!(article_id = id, "Article updated");
    Ok(HttpResponse::Ok().json(Envelope::ok(())))
}

/// DELETE /admin/article/{id}
pub async fn delete_article(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    articles::delete_article(pool.get_ref(), id).await?;

    tracing::info!(article_id = id, "Article deleted");
    Ok(HttpResponse::Ok().json(Envelope::ok(())))
}

/// GET /articles?pageSize=&pageOffset=
pub async fn list_articles(
    query: web::Query<PageQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let (articles, total) =
        articles::list_articles(pool.get_ref(), Pagination::from(query.into_inner())).await?;

    Ok(HttpResponse::Ok().json(Envelope::ok(ArticlePage { articles, total })))
}

/// GET /article/{id}
pub async fn get_article(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let article = articles::get_article(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Envelope::ok(article)))
}
