//! Cache service trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Fast, disposable lookup layer in front of the record store.
///
/// Holds two mappings: alias → original URL (resolve path) and original URL →
/// alias (create path). Both are shadows of store data and can be dropped at any
/// time. Implementations report failures as [`CacheError`]; the caller
/// ([`crate::application::services::LinkService`]) decides to treat them as misses.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::InMemoryCache`] - Process-local cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Looks up the original URL for an alias.
    ///
    /// Returns `Ok(None)` on a miss.
    async fn get_url(&self, alias: &str) -> CacheResult<Option<String>>;

    /// Stores alias → original URL.
    ///
    /// `ttl_seconds = None` applies the implementation's default TTL.
    async fn set_url(
        &self,
        alias: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Looks up the alias already issued for an original URL.
    async fn get_alias(&self, original_url: &str) -> CacheResult<Option<String>>;

    /// Stores original URL → alias.
    async fn set_alias(
        &self,
        original_url: &str,
        alias: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
