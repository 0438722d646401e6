//! Handlers for alias creation and resolution.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::generator::{GenerateRequest, UrlResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL, returning its alias.
///
/// # Endpoint
///
/// `POST /api/generator`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "url": "4c92" }
/// ```
///
/// Submitting a URL that was shortened before returns the existing alias.
///
/// # Errors
///
/// - **400 Bad Request**: unreadable body, empty, too long, or not an absolute
///   http/https URL
/// - **503 Service Unavailable**: record store unreachable
pub async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    payload.check_scheme()?;

    let alias = state.link_service.create(&payload.url).await?;

    Ok((StatusCode::CREATED, Json(UrlResponse { url: alias })))
}

/// Resolves an alias to the original URL.
///
/// # Endpoint
///
/// `GET /api/generator/{alias}`
///
/// # Errors
///
/// - **404 Not Found**: alias unknown or malformed
/// - **503 Service Unavailable**: record store unreachable
pub async fn resolve_handler(
    State(state): State<AppState>,
    Path(alias): Path<String>,
) -> Result<Json<UrlResponse>, AppError> {
    let url = state.link_service.resolve(&alias).await?;

    Ok(Json(UrlResponse { url }))
}
