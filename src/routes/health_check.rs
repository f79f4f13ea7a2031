use actix_web::HttpResponse;

use super::Envelope;

/// Liveness probe; does not touch the database
pub async fn health_check() -> HttpResponse {
    tracing::debug!("Health check endpoint called");
    HttpResponse::Ok().finish()
}

/// `GET /`: service name and version
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(Envelope::ok(concat!(
        env!("CARGO_PKG_NAME"),
        " ",
        env!("CARGO_PKG_VERSION")
    )))
}
