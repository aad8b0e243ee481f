//! # Lekha Blog Server
//!
//! The main entry point for the Actix-web HTTP server: public blog pages,
//! the admin CMS and the SEO assistant.

use actix_files::Files;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod render;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::init_telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_telemetry(&config.telemetry);

    tracing::info!(
        "Starting Lekha blog server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;
    state
        .seed_admin(&config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    tokio::fs::create_dir_all(&config.upload.dir).await?;
    let upload_dir = config.upload.dir.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .service(Files::new("/storage", upload_dir.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
