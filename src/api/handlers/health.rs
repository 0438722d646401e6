//! Handler for health check endpoint.

use axum::{Json, extract::State};

use crate::api::dto::health::HealthResponse;
use crate::state::AppState;

/// Reports live connectivity of the record store and the cache.
///
/// # Endpoint
///
/// `GET /health`
///
/// Always answers `200 OK`; a failing component shows up as `false`.
///
/// ```json
/// { "db": true, "redis": false }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.link_service.health().await;

    if !status.db {
        tracing::warn!("Health check: record store unreachable");
    }

    Json(status.into())
}
