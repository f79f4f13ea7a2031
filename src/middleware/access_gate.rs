/// Access Gate
///
/// Wraps the protected scope. For every request it extracts the bearer
/// token, verifies it, and either stores the `Claims` in the request
/// extensions and forwards, or fails the request with 401 before any
/// handler runs.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::TokenVerifier;
use crate::error::{AppError, AuthError};

pub struct AccessGate {
    verifier: TokenVerifier,
}

impl AccessGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGateService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AccessGateService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct AccessGateService<S> {
    service: Rc<S>,
    verifier: TokenVerifier,
}

impl<S, B> Service<ServiceRequest> for AccessGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = match extract_bearer_token(req.headers()) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(path = %req.path(), method = %req.method(), error = %e, "Request rejected");
                return reject(e);
            }
        };

        match self.verifier.verify(&token) {
            Ok(claims) => {
                tracing::debug!(username = %claims.username, "Token verified");
                req.extensions_mut().insert(claims);

                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => {
                tracing::warn!(
                    path = %req.path(),
                    method = %req.method(),
                    reason = %e,
                    "Token verification failed"
                );
                reject(e.to_auth_error())
            }
        }
    }
}

fn reject<R: 'static>(err: AuthError) -> LocalBoxFuture<'static, Result<R, Error>> {
    Box::pin(async move { Err(AppError::Auth(err).into()) })
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// No header, an empty header, or `Bearer` with nothing after it means no
/// token was presented. Any other scheme is an invalid token.
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = match headers.get(AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| AuthError::TokenInvalid)?.trim(),
        None => return Err(AuthError::TokenNotPresent),
    };

    if value.is_empty() {
        return Err(AuthError::TokenNotPresent);
    }

    let (scheme, token) = match value.split_once(' ') {
        Some((scheme, token)) => (scheme, token.trim()),
        None => (value, ""),
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::TokenInvalid);
    }
    if token.is_empty() {
        return Err(AuthError::TokenNotPresent);
    }

    Ok(token.to_string())
}
