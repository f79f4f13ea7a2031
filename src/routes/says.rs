/// Say Routes
///
/// `GET /say` is public; writes live under `/admin/say`.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::store::says::{self, Say};
use crate::store::{PageQuery, Pagination};
use crate::validators::validate_content;

use super::Envelope;

/// One page of `/say`
#[derive(Serialize)]
pub struct SayPage {
    pub says: Vec<Say>,
    pub total: i64,
}

#[derive(Deserialize)]
pub struct SayRequest {
    #[serde(default)]
    pub content: String,
}

/// GET /say?pageSize=&pageOffset=
pub async fn list_says(
    query: web::Query<PageQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let (says, total) =
        says::list_says(pool.get_ref(), Pagination::from(query.into_inner())).await?;

    Ok(HttpResponse::Ok().json(Envelope::ok(SayPage { says, total })))
}

/// POST /admin/say
pub async fn add_say(
    form: web::Json<SayRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    validate_content(&form.content)?;
    let say = says::insert_say(pool.get_ref(), &form.content).await?;

    tracing::info!(say_id = say.id, "Say created");
    Ok(HttpResponse::Created().json(Envelope::ok(say)))
}

/// PUT /admin/say/{id}
pub async fn update_say(
    path: web::Path<i64>,
    form: web::Json<SayRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    validate_content(&form.content)?;
    says::update_say(pool.get_ref(), id, &form.content).await?;

    tracing::info!(say_id = id, "Say updated");
    Ok(HttpResponse::Ok().json(Envelope::ok(())))
}

/// DELETE /admin/say/{id}
pub async fn delete_say(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    says::delete_say(pool.get_ref(), id).await?;

    tracing::info!(say_id = id, "Say deleted");
    Ok(HttpResponse::Ok().json(Envelope::ok(())))
}
