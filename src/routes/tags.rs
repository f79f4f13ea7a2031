/// Tag Routes (all gated under `/admin/tag`)

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::AppError;
use crate::store::tags;
use crate::validators::validate_tag_name;

use super::Envelope;

#[derive(Deserialize)]
pub struct TagRequest {
    #[serde(default)]
    pub name: String,
}

/// GET /admin/tag
pub async fn list_tags(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let tags = tags::list_tags(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(Envelope::ok(tags)))
}

/// POST /admin/tag
///
/// # Errors
/// - 400: Empty or over-long name
/// - 409: `TAG_EXISTS`
pub async fn add_tag(
    form: web::Json<TagRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let name = validate_tag_name(&form.name)?;
    let tag = tags::insert_tag(pool.get_ref(), &name).await?;

    tracing::info!(tag_id = tag.id, name = %tag.name, "Tag created");
    Ok(HttpResponse::Created().json(Envelope::ok(tag)))
}

/// PUT /admin/tag/{id}
pub async fn update_tag(
    path: web::Path<i64>,
    form: web::Json<TagRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let name = validate_tag_name(&form.name)?;
    tags::update_tag(pool.get_ref(), id, &name).await?;

    tracing::info!(tag_id = id, name = %name, "Tag renamed");
    Ok(HttpResponse::Ok().json(Envelope::ok(())))
}

/// DELETE /admin/tag/{id}
pub async fn delete_tag(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    tags::delete_tag(pool.get_ref(), id).await?;

    tracing::info!(tag_id = id, "Tag deleted");
    Ok(HttpResponse::Ok().json(Envelope::ok(())))
}
