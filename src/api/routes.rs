//! API route configuration.

use crate::api::handlers::{generate_handler, resolve_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes nested under `/api`.
///
/// # Endpoints
///
/// - `POST /generator`         - Shorten a URL
/// - `GET  /generator/{alias}` - Resolve an alias
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/generator", post(generate_handler))
        .route("/generator/{alias}", get(resolve_handler))
}
