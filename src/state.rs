//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::LinkService;

/// State shared by all request handlers.
///
/// Cloned per request by axum; the service sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>) -> Self {
        Self { link_service }
    }
}
