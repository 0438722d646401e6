#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use base62_shortener::application::services::{LinkService, ServiceSettings};
use base62_shortener::infrastructure::cache::{CacheService, InMemoryCache, NullCache};
use base62_shortener::infrastructure::persistence::InMemoryLinkRepository;
use base62_shortener::routes;
use base62_shortener::state::AppState;
use std::sync::Arc;
use tower_http::normalize_path::NormalizePath;

pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<InMemoryLinkRepository>,
    pub cache: Arc<InMemoryCache>,
}

/// The application as served, with its service exposed for seeding records.
pub struct ServedApp {
    pub app: NormalizePath<Router>,
    pub link_service: Arc<LinkService>,
}

fn service_with(
    repository: Arc<InMemoryLinkRepository>,
    cache: Arc<dyn CacheService>,
) -> Arc<LinkService> {
    Arc::new(LinkService::new(
        repository,
        cache,
        ServiceSettings::default(),
    ))
}

fn state_with(repository: Arc<InMemoryLinkRepository>, cache: Arc<dyn CacheService>) -> AppState {
    AppState::new(service_with(repository, cache))
}

/// Full router over the in-memory store and cache.
pub fn create_test_app() -> TestApp {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let cache = Arc::new(InMemoryCache::new(60));
    let state = state_with(repository.clone(), cache.clone());

    TestApp {
        server: TestServer::new(routes::router(state)).unwrap(),
        repository,
        cache,
    }
}

/// Full router over the in-memory store with caching disabled.
pub fn create_uncached_server() -> TestServer {
    let state = state_with(Arc::new(InMemoryLinkRepository::new()), Arc::new(NullCache));
    TestServer::new(routes::router(state)).unwrap()
}

/// [`routes::app_router`], path normalization included, over the in-memory adapters.
pub fn create_served_app() -> ServedApp {
    let link_service = service_with(
        Arc::new(InMemoryLinkRepository::new()),
        Arc::new(InMemoryCache::new(60)),
    );

    ServedApp {
        app: routes::app_router(AppState::new(link_service.clone())),
        link_service,
    }
}
