use actix_web::{web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::auth::extract::{AuthenticatedUser, BasicAuthorized};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub access_token: String,
}

/// Client-side rejections are logged here; server errors are logged once
/// when the error response is rendered.
fn log_rejection(action: &str, username: &str, e: &AppError) -> bool {
    if e.status_code().is_server_error() {
        return false;
    }
    warn!("{} rejected for username: {}: {}", action, username, e);
    true
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Hello, World!")
}

pub async fn secure_data(_: BasicAuthorized) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "This is a protected route, accessible only with valid credentials!"
    }))
}

pub async fn register(
    req: web::Json<CredentialsRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for username: {}", req.username);

    match state.auth_service.register(&req.username, &req.password).await {
        Ok(profile) => Ok(HttpResponse::Created().json(json!({
            "status": "success",
            "message": "User Registered!",
            "data": {
                "username": profile,
            },
        }))),
        Err(e) => {
            log_rejection("Registration", &req.username, &e);
            Err(e)
        }
    }
}

pub async fn login(
    req: web::Json<CredentialsRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for username: {}", req.username);

    match state.auth_service.login(&req.username, &req.password).await {
        Ok(access_token) => Ok(HttpResponse::Created().json(json!({
            "status": "success",
            "message": "User Logged In!",
            "data": LoginData { access_token },
        }))),
        Err(e) => {
            log_rejection("Login", &req.username, &e);
            Err(e)
        }
    }
}

pub async fn profile(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Logged In User Information.",
        "data": {
            "user": user,
        },
    }))
}
