//! Credit Risk Scoring Service - Main Entry Point
//!
//! Loads the training artifacts once, then serves `/predict` over HTTP.
//! The server never starts if any artifact fails to load.

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use credit_risk_scoring::{
    api::{self, BatchLimit},
    config::{AppConfig, LoggingConfig},
    ScoringService,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("Invalid log level")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.is_json() {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load()?;
    init_tracing(&config.logging)?;

    info!("Starting Credit Risk Scoring Service");

    let service = ScoringService::from_config(&config)?;
    let summary = service.summary();
    info!(
        model = %summary.model_name,
        format = summary.model_format,
        features = summary.feature_count,
        "Artifacts loaded"
    );

    let service = web::Data::new(service);
    let batch_limit = web::Data::new(BatchLimit(config.server.max_batch_size));
    let bind_addr = config.server.bind_addr();

    info!(
        bind = %bind_addr,
        workers = config.server.workers,
        max_batch_size = config.server.max_batch_size,
        "Starting HTTP server"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(service.clone())
            .app_data(batch_limit.clone())
            .configure(api::configure)
    })
    .workers(config.server.workers)
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await?;

    info!("Service shutting down...");
    Ok(())
}
