use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),

    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::InternalError(format!("password hashing failed: {}", err))
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        AppError::InternalError(format!("blocking task failed: {}", err))
    }
}

impl AppError {
    /// Message sent to the client. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::AuthError(e) => e.to_string(),
            AppError::ValidationError(msg) => msg.clone(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let message = self.public_message();
        let response = match self {
            AppError::AuthError(e) if e.is_basic_flow() => json!({ "message": message }),
            _ => json!({
                "status": "fail",
                "message": message
            }),
        };
        HttpResponse::build(status).json(response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthError(e) => match e {
                AuthError::MissingHeader => StatusCode::UNAUTHORIZED,
                AuthError::MalformedHeader => StatusCode::UNAUTHORIZED,
                AuthError::InvalidCredentials => StatusCode::FORBIDDEN,
                AuthError::UsernameTaken => StatusCode::BAD_REQUEST,
                AuthError::UserNotFound => StatusCode::BAD_REQUEST,
                AuthError::WrongPassword => StatusCode::BAD_REQUEST,
                AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            },
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("No authorization header provided")]
    MissingHeader,

    #[error("Invalid authorization format")]
    MalformedHeader,

    #[error("Forbidden: Invalid credentials")]
    InvalidCredentials,

    #[error("Username Taken!")]
    UsernameTaken,

    #[error("User Not Found!")]
    UserNotFound,

    #[error("Wrong Password!")]
    WrongPassword,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("No access token provided")]
    MissingToken,
}

impl AuthError {
    /// Errors raised by the Basic auth gate, which answer with a bare `{message}` body.
    pub fn is_basic_flow(&self) -> bool {
        matches!(
            self,
            AuthError::MissingHeader | AuthError::MalformedHeader | AuthError::InvalidCredentials
        )
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
