//! Health check endpoints for liveness and readiness checks

use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

use crate::models::inference::{ArtifactSummary, ScoringService};

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub artifacts: ArtifactSummary,
}

/// Liveness check endpoint
///
/// Always returns 200 OK if the service is running.
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint
///
/// The server only binds after every artifact has loaded, so a reachable
/// service is ready; the body reports what was loaded.
#[get("/health/ready")]
pub async fn readiness(service: web::Data<ScoringService>) -> impl Responder {
    HttpResponse::Ok().json(ReadinessStatus {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        artifacts: service.summary(),
    })
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}
