//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init(&telemetry::TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("starting Quill API server on {}:{}", config.host, config.port);

    let db = quill_infra::connect(&config.database)
        .await
        .map_err(|e| std::io::Error::other(format!("database connection failed: {e}")))?;

    let state = AppState::new(db, config.site.clone(), config.jwt.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
