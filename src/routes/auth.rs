/// Authentication Routes
///
/// Login, password re-check and administrator credential update.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::{Authenticator, Claims};
use crate::error::{AppError, ErrorContext};
use crate::validators::require_credentials;

use super::Envelope;

/// Body of `/login`, `/check` and `/admin/user`
#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /login
///
/// Verify the administrator's credentials and return a signed token.
///
/// # Errors
/// - 400: Missing username or password
/// - 401: `USER_NOT_FOUND` or `BAD_CREDENTIALS`
/// - 500: Token signing or lookup failure
pub async fn login(
    form: web::Json<CredentialsRequest>,
    authenticator: web::Data<Authenticator>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("login").with_username(&form.username);
    require_credentials(&form.username, &form.password)?;

    let token = authenticator
        .login(&form.username, &form.password)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    tracing::info!(
        request_id = %context.request_id,
        username = %form.username,
        "Administrator logged in"
    );

    Ok(HttpResponse::Ok().json(Envelope::ok(token)))
}

/// POST /check
///
/// Same checks as `/login` without issuing a token. Used by the admin panel
/// to confirm the current password before showing the account form.
pub async fn check_password(
    form: web::Json<CredentialsRequest>,
    authenticator: web::Data<Authenticator>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("check_password").with_username(&form.username);
    require_credentials(&form.username, &form.password)?;

    authenticator
        .check_password(&form.username, &form.password)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    Ok(HttpResponse::Ok().json(Envelope::ok(())))
}

/// PUT /admin/user
///
/// Replace the administrator's username and password. **Requires a valid
/// token**; the claims are injected by the access gate.
///
/// # Errors
/// - 400: Username shorter than 2 or password shorter than 6 characters
/// - 401: Rejected by the access gate
/// - 500: Persistence failure
pub async fn update_user(
    claims: web::ReqData<Claims>,
    form: web::Json<CredentialsRequest>,
    authenticator: web::Data<Authenticator>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("update_user").with_username(&claims.username);

    authenticator
        .update_credentials(&form.username, &form.password)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    Ok(HttpResponse::Ok().json(Envelope::ok(())))
}
