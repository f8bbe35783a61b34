pub mod auth;
pub mod config;
pub mod error;
pub mod store;

use std::sync::Arc;
use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, BasicAuthGate, AuthenticatedUser, BasicAuthorized};
pub use store::{CredentialStore, InMemoryCredentialStore, User};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub basic_gate: Arc<BasicAuthGate>,
}

impl AppState {
    /// State backed by a fresh in-memory credential store.
    pub fn new(config: Settings) -> Self {
        Self::with_store(config, Arc::new(InMemoryCredentialStore::new()))
    }

    pub fn with_store(config: Settings, store: Arc<dyn CredentialStore>) -> Self {
        let auth_service = AuthService::new(store, config.auth.clone());
        let basic_gate = BasicAuthGate::new(config.basic_auth.clone().into());

        Self {
            auth_service: Arc::new(auth_service),
            basic_gate: Arc::new(basic_gate),
        }
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(format!("Invalid request body: {}", err)).into()
}

/// Register every route on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use auth::handlers;

    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/", web::get().to(handlers::index))
        .route("/health", web::get().to(health_check))
        .route("/api/secure-data", web::get().to(handlers::secure_data))
        .route("/register", web::post().to(handlers::register))
        .route("/login", web::post().to(handlers::login))
        .route("/profile", web::get().to(handlers::profile));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_clone() {
        let config = Settings::new_for_test().expect("Failed to load test config");
        let state = AppState::new(config);

        let cloned = state.clone();

        // Verify Arc references are shared
        assert!(Arc::ptr_eq(&state.auth_service, &cloned.auth_service));
        assert!(Arc::ptr_eq(&state.basic_gate, &cloned.basic_gate));
    }

    #[actix_web::test]
    async fn test_state_uses_injected_store() {
        let config = Settings::new_for_test().expect("Failed to load test config");
        let store = Arc::new(InMemoryCredentialStore::new());
        let state = AppState::with_store(config, store.clone());

        state.auth_service.register("alice", "pw").await.unwrap();
        assert!(store.exists("alice").await.unwrap());
    }
}
