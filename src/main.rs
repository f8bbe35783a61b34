use actix_web::{web, App, HttpServer};
use actix_cors::Cors;
use authkit_server::{configure, AppState, Settings, AppError};
use dotenv::dotenv;
use std::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[actix_web::main]
async fn main() -> authkit_server::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    // Load configuration
    let config = Settings::new()?;
    info!("Configuration loaded successfully ({} environment)", config.environment);

    let state = web::Data::new(AppState::new(config.clone()));

    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;
    info!("Starting server at http://{}:{}", config.server.host, config.server.port);

    HttpServer::new(move || {
        let cors = if config.cors.enabled {
            let cors_config = Cors::default();

            let cors_config = if config.cors.allow_any_origin {
                cors_config
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
            } else {
                cors_config
                    .allowed_origin("http://localhost:8080")
                    .allowed_origin("http://127.0.0.1:8080")
                    .allowed_methods(vec!["GET", "POST"])
                    .allowed_headers(vec!["Authorization", "Content-Type"])
            };

            cors_config.max_age(config.cors.max_age as usize)
        } else {
            // CORS disabled - use most restrictive settings
            Cors::default()
        };

        App::new()
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(())
}
