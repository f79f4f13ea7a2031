use actix_web::dev::Server;
use actix_web::{web, App, HttpRequest, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::{Authenticator, CredentialStore, PasswordHasher, TokenIssuer, TokenVerifier};
use crate::configuration::AuthSettings;
use crate::error::{AppError, ValidationError};
use crate::logger::LoggerMiddleware;
use crate::middleware::AccessGate;
use crate::routes::{
    add_article, add_say, add_tag, check_password, delete_article, delete_say, delete_tag,
    get_article, health_check, index, list_articles, list_says, list_tags, login, update_article,
    update_say, update_tag, update_user,
};

/// Wire the auth core from its configured secrets
pub fn build_authenticator(
    credentials: Arc<dyn CredentialStore>,
    auth: &AuthSettings,
) -> Authenticator {
    Authenticator::new(
        credentials,
        PasswordHasher::new(&auth.password_secret),
        TokenIssuer::new(&auth.jwt_secret),
    )
}

fn malformed(err: impl std::fmt::Display, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), error = %err, "Malformed request");
    AppError::from(ValidationError::Malformed(err.to_string())).into()
}

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    authenticator: Authenticator,
    verifier: TokenVerifier,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let authenticator = web::Data::new(authenticator);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(LoggerMiddleware)
            // Shared state
            .app_data(connection.clone())
            .app_data(authenticator.clone())
            // Extractor failures answer with INVALID_REQUEST
            .app_data(web::JsonConfig::default().error_handler(|err, req| malformed(err, req)))
            .app_data(web::PathConfig::default().error_handler(|err, req| malformed(err, req)))
            .app_data(web::QueryConfig::default().error_handler(|err, req| malformed(err, req)))
            // Public routes
            .route("/", web::get().to(index))
            .route("/health_check", web::get().to(health_check))
            .route("/login", web::post().to(login))
            .route("/check", web::post().to(check_password))
            .route("/articles", web::get().to(list_articles))
            .route("/article/{id}", web::get().to(get_article))
            .route("/say", web::get().to(list_says))
            // Protected routes (require a valid token)
            .service(
                web::scope("/admin")
                    .wrap(AccessGate::new(verifier.clone()))
                    .route("/user", web::put().to(update_user))
                    .route("/article", web::post().to(add_article))
                    .route("/article/{id}", web::put().to(update_article))
                    .route("/article/{id}", web::delete().to(delete_article))
                    .route("/tag", web::get().to(list_tags))
                    .route("/tag", web::post().to(add_tag))
                    .route("/tag/{id}", web::put().to(update_tag))
                    .route("/tag/{id}", web::delete().to(delete_tag))
                    .route("/say", web::post().to(add_say))
                    .route("/say/{id}", web::put().to(update_say))
                    .route("/say/{id}", web::delete().to(delete_say)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
