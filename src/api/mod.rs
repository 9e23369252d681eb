//! HTTP API

pub mod error;
pub mod health;
pub mod predict;

use actix_web::web;

pub use error::ApiError;
pub use predict::BatchLimit;

/// Register all routes, with JSON payload errors reported as `bad_request`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .configure(predict::configure)
    .configure(health::configure);
}
