//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::AccessLog;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    // Misconfiguration or an unreachable store is fatal
    let state = AppState::build(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Startup failed");
        std::io::Error::other(e)
    })?;
    let posts = state.posts.clone();
    let access_log = AccessLog::new();

    // Wrap order: the last wrap runs first (tracing, then CORS, then access log)
    let served = HttpServer::new(move || {
        App::new()
            .wrap(access_log.clone())
            .wrap(middleware::cors())
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    if let Err(e) = posts.close().await {
        tracing::error!(error = %e, "Failed to close post repository");
    }
    tracing::info!("Shutdown complete");

    served
}
