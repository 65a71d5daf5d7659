//! Health check endpoints.

use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::models::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Service name.
    pub service: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Service status.
    pub status: &'static str,
    /// Number of tracks in the catalog.
    pub catalog_tracks: usize,
    /// Assets folder accessible (true when none is configured).
    pub assets_folder: bool,
}

/// Health check endpoint.
///
/// GET /health
///
/// Returns 200 if the service is running.
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: env!("CARGO_PKG_NAME"),
    })
}

/// Readiness check endpoint.
///
/// GET /ready
///
/// Returns 200 if the service is ready to accept requests.
#[get("/ready")]
pub async fn ready(data: web::Data<AppState>) -> HttpResponse {
    let catalog_tracks = data.catalog.tracks().len();
    let assets_ok = data
        .assets_folder
        .as_ref()
        .map(|p| p.is_dir())
        .unwrap_or(true);

    let all_ok = catalog_tracks > 0 && assets_ok;

    let response = ReadyResponse {
        status: if all_ok { "ready" } else { "not_ready" },
        catalog_tracks,
        assets_folder: assets_ok,
    };

    if all_ok {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Configure health routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(ready);
}
