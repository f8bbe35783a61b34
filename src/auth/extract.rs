//! Request guards for protected routes.
//!
//! Both gates are actix extractors: a handler that takes one as an argument
//! only runs once the gate has allowed the request.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde::Serialize;

use crate::error::{AppError, AuthError};
use crate::AppState;

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalError("application state not configured".into()))
}

/// Raw `Authorization` header. Values that are not visible ASCII are malformed.
fn authorization_header(req: &HttpRequest) -> Result<Option<&str>, AuthError> {
    match req.headers().get(header::AUTHORIZATION) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| AuthError::MalformedHeader),
    }
}

/// Proof that the request passed the Basic auth gate.
#[derive(Debug, Clone, Copy)]
pub struct BasicAuthorized;

impl FromRequest for BasicAuthorized {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = app_state(req).and_then(|state| {
            let header = authorization_header(req)?;
            state.basic_gate.check(header)?;
            Ok(BasicAuthorized)
        });
        ready(result)
    }
}

/// The user a verified bearer token was issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = app_state(req).and_then(|state| {
            let token = bearer_token(authorization_header(req)?)?;
            let claims = state.auth_service.verify(token)?;
            Ok(AuthenticatedUser {
                username: claims.username,
            })
        });
        ready(result)
    }
}

fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    Ok(token)
}
