//! Process-local cache implementation.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    /// `None` when the TTL runs past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// In-memory cache with per-entry TTL, backed by `DashMap`.
///
/// Expired entries are dropped lazily on read. Useful for single-process
/// deployments and for exercising the cache path in tests without Redis.
#[derive(Debug)]
pub struct InMemoryCache {
    urls: DashMap<String, Entry>,
    aliases: DashMap<String, Entry>,
    default_ttl: Duration,
}

impl InMemoryCache {
    pub fn new(default_ttl_seconds: u64) -> Self {
        Self {
            urls: DashMap::new(),
            aliases: DashMap::new(),
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }

    /// Drops every cached entry, as a restart or `FLUSHDB` would.
    pub fn clear(&self) {
        self.urls.clear();
        self.aliases.clear();
    }

    /// Returns true if an unexpired alias → URL entry exists.
    pub fn contains_alias(&self, alias: &str) -> bool {
        self.urls.get(alias).is_some_and(|e| !e.is_expired())
    }

    /// Returns true if an unexpired URL → alias entry exists.
    pub fn contains_url(&self, original_url: &str) -> bool {
        self.aliases.get(original_url).is_some_and(|e| !e.is_expired())
    }

    fn read(map: &DashMap<String, Entry>, key: &str) -> Option<String> {
        let entry = map.get(key)?;
        if entry.is_expired() {
            drop(entry);
            map.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    fn write(&self, map: &DashMap<String, Entry>, key: &str, value: &str, ttl: Option<u64>) {
        let ttl = ttl.map(Duration::from_secs).unwrap_or(self.default_ttl);
        map.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now().checked_add(ttl),
            },
        );
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get_url(&self, alias: &str) -> CacheResult<Option<String>> {
        Ok(Self::read(&self.urls, alias))
    }

    async fn set_url(
        &self,
        alias: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.write(&self.urls, alias, original_url, ttl_seconds);
        Ok(())
    }

    async fn get_alias(&self, original_url: &str) -> CacheResult<Option<String>> {
        Ok(Self::read(&self.aliases, original_url))
    }

    async fn set_alias(
        &self,
        original_url: &str,
        alias: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.write(&self.aliases, original_url, alias, ttl_seconds);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
