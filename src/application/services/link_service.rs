//! Link creation and resolution service.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::entities::{Link, LinkRecord, PendingLink};
use crate::domain::repositories::{LinkCounts, LinkRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheResult, CacheService};
use crate::utils::base62;

/// Longest original URL accepted, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// Timeouts and TTL applied by [`LinkService`] to every collaborator call.
#[derive(Debug, Clone, Copy)]
pub struct ServiceSettings {
    /// Budget for a single record store call; exceeding it fails the request.
    pub store_timeout: Duration,
    /// Budget for a single cache call; exceeding it counts as a miss.
    pub cache_timeout: Duration,
    /// TTL passed to cache writes; `None` uses the cache's own default.
    pub cache_ttl_seconds: Option<u64>,
}

impl ServiceSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            store_timeout: Duration::from_millis(config.store_timeout_ms),
            cache_timeout: Duration::from_millis(config.cache_timeout_ms),
            cache_ttl_seconds: Some(config.cache_ttl_seconds),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(2),
            cache_timeout: Duration::from_millis(250),
            cache_ttl_seconds: None,
        }
    }
}

/// Live connectivity of both collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthStatus {
    pub db: bool,
    pub redis: bool,
}

/// Service for creating aliases and resolving them back to URLs.
///
/// Holds no mutable state of its own: every call goes to the record store and the
/// cache, so a single instance is shared by all requests.
///
/// # Consistency
///
/// The record store is authoritative. The cache is written through on create and
/// repaired on a resolve miss. Cache failures and cache timeouts are logged and
/// treated as misses; they never fail a request.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    settings: ServiceSettings,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            settings,
        }
    }

    /// Returns the alias for `original_url`, creating a record on first sight.
    ///
    /// Submitting the same URL again returns the same alias without allocating a
    /// new id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is empty or longer than
    /// [`MAX_URL_LENGTH`] characters, and [`AppError::Unavailable`] if the record
    /// store cannot be reached in time.
    pub async fn create(&self, original_url: &str) -> Result<String, AppError> {
        validate_url(original_url)?;

        if let Some(alias) = self
            .cache_read(self.cache.get_alias(original_url))
            .await
        {
            debug!("Cache HIT for url {}", original_url);
            counter!("shortener_links_deduplicated_total").increment(1);
            return Ok(alias);
        }

        let link = self.create_link(original_url).await?;
        Ok(link.alias)
    }

    /// Like [`Self::create`] but always consults the store and returns the full record.
    ///
    /// # Errors
    ///
    /// See [`Self::create`].
    pub async fn create_link(&self, original_url: &str) -> Result<Link, AppError> {
        validate_url(original_url)?;
        self.find_or_insert(original_url).await
    }

    /// Resolves an alias to its original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for malformed and unknown aliases alike, and
    /// [`AppError::Unavailable`] if the record store cannot be reached in time.
    pub async fn resolve(&self, alias: &str) -> Result<String, AppError> {
        if let Some(url) = self.cache_read(self.cache.get_url(alias)).await {
            debug!("Cache HIT for alias {}", alias);
            counter!("shortener_cache_hits_total").increment(1);
            return Ok(url);
        }

        debug!("Cache MISS for alias {}", alias);
        counter!("shortener_cache_misses_total").increment(1);

        let not_found = || AppError::not_found("Alias not found", json!({ "alias": alias }));

        let id = match base62::decode(alias) {
            Ok(value) => i64::try_from(value)
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(not_found)?,
            Err(e) => {
                debug!("Rejected alias {:?}: {}", alias, e);
                return Err(not_found());
            }
        };

        // Non-canonical spellings such as "01" decode to a real id but were never issued.
        let link = self
            .store(self.repository.find_by_id(id))
            .await?
            .and_then(LinkRecord::into_aliased)
            .filter(|link| link.alias == alias)
            .ok_or_else(not_found)?;

        self.populate_cache(&link).await;

        Ok(link.original_url)
    }

    /// Probes the record store and the cache. Never fails.
    pub async fn health(&self) -> HealthStatus {
        let (db, redis) = tokio::join!(
            tokio::time::timeout(self.settings.store_timeout, self.repository.health_check()),
            tokio::time::timeout(self.settings.cache_timeout, self.cache.health_check()),
        );

        HealthStatus {
            db: db.unwrap_or(false),
            redis: redis.unwrap_or(false),
        }
    }

    /// Record counts from the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the record store cannot be reached in time.
    pub async fn counts(&self) -> Result<LinkCounts, AppError> {
        self.store(self.repository.count()).await
    }

    /// Attaches aliases to up to `limit` records left pending by interrupted creates.
    ///
    /// # Errors
    ///
    /// Stops at the first store error and returns it.
    pub async fn repair_pending(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        let pending = self.store(self.repository.list_pending(limit)).await?;
        let mut repaired = Vec::with_capacity(pending.len());

        for record in pending {
            let link = self.attach(record).await?;
            info!(id = link.id, alias = %link.alias, "Repaired pending link");
            self.populate_cache(&link).await;
            repaired.push(link);
        }

        Ok(repaired)
    }

    async fn find_or_insert(&self, original_url: &str) -> Result<Link, AppError> {
        if let Some(record) = self.store(self.repository.find_by_url(original_url)).await? {
            let link = self.complete(record).await?;
            counter!("shortener_links_deduplicated_total").increment(1);
            self.populate_cache(&link).await;
            return Ok(link);
        }

        let pending = match self.store(self.repository.insert(original_url)).await {
            Ok(pending) => pending,
            Err(AppError::Conflict { .. }) => {
                // Lost a concurrent insert race; the winner's row is the answer.
                warn!("Concurrent insert for {}, re-reading", original_url);
                let record = self
                    .store(self.repository.find_by_url(original_url))
                    .await?
                    .ok_or_else(|| {
                        AppError::internal(
                            "Conflicting link disappeared",
                            json!({ "original_url": original_url }),
                        )
                    })?;
                let link = self.complete(record).await?;
                self.populate_cache(&link).await;
                return Ok(link);
            }
            Err(e) => return Err(e),
        };

        let link = self.attach(pending).await?;
        info!(id = link.id, alias = %link.alias, "Link created");
        counter!("shortener_links_created_total").increment(1);

        self.populate_cache(&link).await;
        Ok(link)
    }

    /// Returns the aliased link, attaching the alias first if the record is pending.
    async fn complete(&self, record: LinkRecord) -> Result<Link, AppError> {
        match record {
            LinkRecord::Aliased(link) => Ok(link),
            LinkRecord::Pending(pending) => {
                warn!(id = pending.id, "Found link without alias, attaching");
                self.attach(pending).await
            }
        }
    }

    async fn attach(&self, pending: PendingLink) -> Result<Link, AppError> {
        let alias = alias_for(pending.id)?;
        let updated_at = self
            .store(self.repository.attach_alias(pending.id, &alias))
            .await?;

        Ok(pending.into_link(alias, updated_at))
    }

    async fn populate_cache(&self, link: &Link) {
        let ttl = self.settings.cache_ttl_seconds;
        tokio::join!(
            self.cache_write(self.cache.set_url(&link.alias, &link.original_url, ttl)),
            self.cache_write(self.cache.set_alias(&link.original_url, &link.alias, ttl)),
        );
    }

    async fn store<T>(
        &self,
        call: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        match tokio::time::timeout(self.settings.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    "Record store call exceeded {:?}",
                    self.settings.store_timeout
                );
                Err(AppError::unavailable(
                    "Record store timed out",
                    json!({ "timeout_ms": self.settings.store_timeout.as_millis() as u64 }),
                ))
            }
        }
    }

    async fn cache_read(
        &self,
        call: impl Future<Output = CacheResult<Option<String>>>,
    ) -> Option<String> {
        match tokio::time::timeout(self.settings.cache_timeout, call).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                warn!("Cache read failed, falling back to store: {}", e);
                counter!("shortener_cache_errors_total").increment(1);
                None
            }
            Err(_) => {
                warn!("Cache read timed out, falling back to store");
                counter!("shortener_cache_errors_total").increment(1);
                None
            }
        }
    }

    async fn cache_write(&self, call: impl Future<Output = CacheResult<()>>) {
        match tokio::time::timeout(self.settings.cache_timeout, call).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("Cache write failed: {}", e);
                counter!("shortener_cache_errors_total").increment(1);
            }
            Err(_) => {
                warn!("Cache write timed out");
                counter!("shortener_cache_errors_total").increment(1);
            }
        }
    }
}

/// Checks the length bound on an original URL.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the URL is empty or longer than
/// [`MAX_URL_LENGTH`] characters.
pub fn validate_url(original_url: &str) -> Result<(), AppError> {
    if original_url.is_empty() {
        return Err(AppError::bad_request("URL must not be empty", json!({})));
    }

    let length = original_url.chars().count();
    if length > MAX_URL_LENGTH {
        return Err(AppError::bad_request(
            format!("URL must be at most {} characters", MAX_URL_LENGTH),
            json!({ "provided_length": length, "max_length": MAX_URL_LENGTH }),
        ));
    }

    Ok(())
}

fn alias_for(id: i64) -> Result<String, AppError> {
    u64::try_from(id)
        .ok()
        .filter(|n| *n > 0)
        .map(base62::encode)
        .ok_or_else(|| AppError::internal("Store returned a non-positive id", json!({ "id": id })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{CacheError, InMemoryCache, MockCacheService, NullCache};
    use crate::infrastructure::persistence::InMemoryLinkRepository;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    fn pending(id: i64, url: &str) -> PendingLink {
        PendingLink::new(id, url.to_string(), Utc::now())
    }

    fn aliased(id: i64, url: &str) -> LinkRecord {
        let now = Utc::now();
        LinkRecord::Aliased(Link::new(
            id,
            url.to_string(),
            base62::encode(id as u64),
            now,
            now,
        ))
    }

    fn in_memory() -> (LinkService, Arc<InMemoryLinkRepository>, Arc<InMemoryCache>) {
        let repo = Arc::new(InMemoryLinkRepository::new());
        let cache = Arc::new(InMemoryCache::new(60));
        let service = LinkService::new(repo.clone(), cache.clone(), ServiceSettings::default());
        (service, repo, cache)
    }

    fn missing_cache() -> MockCacheService {
        let mut cache = MockCacheService::new();
        cache.expect_get_url().returning(|_| Ok(None));
        cache.expect_get_alias().returning(|_| Ok(None));
        cache.expect_set_url().returning(|_, _, _| Ok(()));
        cache.expect_set_alias().returning(|_, _, _| Ok(()));
        cache
    }

    fn failing_cache() -> MockCacheService {
        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .returning(|_| Err(CacheError::ConnectionError("down".to_string())));
        cache
            .expect_get_alias()
            .returning(|_| Err(CacheError::ConnectionError("down".to_string())));
        cache
            .expect_set_url()
            .returning(|_, _, _| Err(CacheError::OperationError("down".to_string())));
        cache
            .expect_set_alias()
            .returning(|_, _, _| Err(CacheError::OperationError("down".to_string())));
        cache.expect_health_check().returning(|| false);
        cache
    }

    #[tokio::test]
    async fn test_first_link_gets_alias_one() {
        let (service, _, _) = in_memory();

        let alias = service.create("https://example.com/foo").await.unwrap();
        assert_eq!(alias, "1");
    }

    #[tokio::test]
    async fn test_sixty_third_link_gets_alias_eleven() {
        let (service, _, _) = in_memory();

        let mut last = String::new();
        for i in 1..=63 {
            last = service
                .create(&format!("https://example.com/{i}"))
                .await
                .unwrap();
        }

        assert_eq!(last, "11");
        assert_eq!(service.resolve("10").await.unwrap(), "https://example.com/62");
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let (service, repo, _) = in_memory();

        let first = service.create("https://x.test/a").await.unwrap();
        let second = service.create("https://x.test/a").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.rows_for_url("https://x.test/a"), 1);
    }

    #[tokio::test]
    async fn test_create_is_idempotent_without_cache() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        let service = LinkService::new(repo.clone(), Arc::new(NullCache), ServiceSettings::default());

        let first = service.create("https://x.test/a").await.unwrap();
        let second = service.create("https://x.test/a").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.rows_for_url("https://x.test/a"), 1);
    }

    #[tokio::test]
    async fn test_resolve_after_create() {
        let (service, _, _) = in_memory();
        let url = "https://example.com/path?q=1&r=two#frag";

        let alias = service.create(url).await.unwrap();
        assert_eq!(service.resolve(&alias).await.unwrap(), url);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_url() {
        let (service, repo, _) = in_memory();

        let err = service.create("").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(repo.count().await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_create_length_bound() {
        let (service, _, _) = in_memory();
        let prefix = "https://example.com/";

        let at_limit = format!("{}{}", prefix, "a".repeat(MAX_URL_LENGTH - prefix.len()));
        assert!(service.create(&at_limit).await.is_ok());

        let over_limit = format!("{}b", at_limit);
        let err = service.create(&over_limit).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_validate_url_counts_characters_not_bytes() {
        let url = "é".repeat(MAX_URL_LENGTH);
        assert!(url.len() > MAX_URL_LENGTH);
        assert!(validate_url(&url).is_ok());
    }

    #[tokio::test]
    async fn test_resolve_unknown_aliases() {
        let (service, _, _) = in_memory();
        service.create("https://example.com").await.unwrap();

        for alias in ["!!!", "zzzzzzzzzzzz", "zz", "", "0", "a b"] {
            let err = service.resolve(alias).await.unwrap_err();
            assert!(
                matches!(err, AppError::NotFound { .. }),
                "expected not found for {alias:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_resolve_rejects_non_canonical_alias() {
        let (service, _, _) = in_memory();
        let alias = service.create("https://example.com").await.unwrap();
        assert_eq!(alias, "1");

        let err = service.resolve("01").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_pending_record_is_not_found() {
        let (service, repo, _) = in_memory();
        let pending = repo.insert("https://example.com").await.unwrap();

        let err = service
            .resolve(&base62::encode(pending.id as u64))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_cache_transparency() {
        let (service, _, cache) = in_memory();
        let alias = service.create("https://example.com/warm").await.unwrap();

        let warm = service.resolve(&alias).await.unwrap();
        cache.clear();
        assert!(!cache.contains_alias(&alias));

        let cold = service.resolve(&alias).await.unwrap();
        assert_eq!(warm, cold);
        assert!(cache.contains_alias(&alias));
    }

    #[tokio::test]
    async fn test_create_writes_through_both_directions() {
        let (service, _, cache) = in_memory();

        let alias = service.create("https://example.com").await.unwrap();

        assert!(cache.contains_alias(&alias));
        assert!(cache.contains_url("https://example.com"));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id().times(0);

        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .withf(|alias| alias == "abc")
            .times(1)
            .returning(|_| Ok(Some("https://cached.example".to_string())));

        let service = LinkService::new(Arc::new(repo), Arc::new(cache), ServiceSettings::default());

        assert_eq!(service.resolve("abc").await.unwrap(), "https://cached.example");
    }

    #[tokio::test]
    async fn test_create_cache_hit_skips_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_url().times(0);
        repo.expect_insert().times(0);

        let mut cache = MockCacheService::new();
        cache
            .expect_get_alias()
            .times(1)
            .returning(|_| Ok(Some("7".to_string())));

        let service = LinkService::new(Arc::new(repo), Arc::new(cache), ServiceSettings::default());

        assert_eq!(service.create("https://example.com").await.unwrap(), "7");
    }

    #[tokio::test]
    async fn test_cache_errors_degrade_to_store() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        let service = LinkService::new(
            repo.clone(),
            Arc::new(failing_cache()),
            ServiceSettings::default(),
        );

        let alias = service.create("https://example.com").await.unwrap();
        assert_eq!(service.resolve(&alias).await.unwrap(), "https://example.com");
        assert_eq!(service.create("https://example.com").await.unwrap(), alias);
        assert_eq!(repo.rows_for_url("https://example.com"), 1);
    }

    #[tokio::test]
    async fn test_existing_link_is_returned_without_insert() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_url()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(|url| Ok(Some(aliased(5, url))));
        repo.expect_insert().times(0);
        repo.expect_attach_alias().times(0);

        let service = LinkService::new(
            Arc::new(repo),
            Arc::new(missing_cache()),
            ServiceSettings::default(),
        );

        assert_eq!(service.create("https://example.com").await.unwrap(), "5");
    }

    #[tokio::test]
    async fn test_pending_duplicate_is_completed_not_reinserted() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_url()
            .times(1)
            .returning(|url| Ok(Some(LinkRecord::Pending(pending(62, url)))));
        repo.expect_insert().times(0);
        repo.expect_attach_alias()
            .withf(|id, alias| *id == 62 && alias == "10")
            .times(1)
            .returning(|_, _| Ok(Utc::now()));

        let service = LinkService::new(
            Arc::new(repo),
            Arc::new(missing_cache()),
            ServiceSettings::default(),
        );

        assert_eq!(service.create("https://example.com").await.unwrap(), "10");
    }

    #[tokio::test]
    async fn test_insert_encodes_and_attaches() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_url().times(1).returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .returning(|url| Ok(pending(3844, url)));
        repo.expect_attach_alias()
            .withf(|id, alias| *id == 3844 && alias == "100")
            .times(1)
            .returning(|_, _| Ok(Utc::now()));

        let service = LinkService::new(
            Arc::new(repo),
            Arc::new(missing_cache()),
            ServiceSettings::default(),
        );

        let link = service.create_link("https://example.com").await.unwrap();
        assert_eq!(link.id, 3844);
        assert_eq!(link.alias, "100");
    }

    #[tokio::test]
    async fn test_insert_conflict_is_recovered_by_reading() {
        let mut repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_find_by_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));
        repo.expect_find_by_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|url| Ok(Some(aliased(9, url))));
        repo.expect_attach_alias().times(0);

        let service = LinkService::new(
            Arc::new(repo),
            Arc::new(missing_cache()),
            ServiceSettings::default(),
        );

        assert_eq!(service.create("https://example.com").await.unwrap(), "9");
    }

    #[tokio::test]
    async fn test_concurrent_creates_share_one_row_with_unique_store() {
        let repo = Arc::new(InMemoryLinkRepository::with_unique_urls());
        let service = Arc::new(LinkService::new(
            repo.clone(),
            Arc::new(NullCache),
            ServiceSettings::default(),
        ));

        let mut handles = vec![];
        for _ in 0..16 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.create("https://race.test").await.unwrap()
            }));
        }

        let mut aliases = vec![];
        for handle in handles {
            aliases.push(handle.await.unwrap());
        }
        aliases.dedup();

        assert_eq!(aliases.len(), 1);
        assert_eq!(repo.rows_for_url("https://race.test"), 1);
    }

    #[tokio::test]
    async fn test_store_unavailable_is_surfaced() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Err(AppError::unavailable("Record store unavailable", json!({}))));

        let service = LinkService::new(
            Arc::new(repo),
            Arc::new(missing_cache()),
            ServiceSettings::default(),
        );

        let err = service.resolve("1").await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable { .. }));
    }

    struct SlowCache;

    #[async_trait]
    impl CacheService for SlowCache {
        async fn get_url(&self, _alias: &str) -> CacheResult<Option<String>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Some("https://stale.example".to_string()))
        }

        async fn set_url(&self, _: &str, _: &str, _: Option<u64>) -> CacheResult<()> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }

        async fn get_alias(&self, _original_url: &str) -> CacheResult<Option<String>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn set_alias(&self, _: &str, _: &str, _: Option<u64>) -> CacheResult<()> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }

        async fn health_check(&self) -> bool {
            tokio::time::sleep(Duration::from_secs(5)).await;
            true
        }
    }

    struct SlowRepository;

    #[async_trait]
    impl LinkRepository for SlowRepository {
        async fn insert(&self, _: &str) -> Result<PendingLink, AppError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(pending(1, "https://example.com"))
        }

        async fn attach_alias(&self, _: i64, _: &str) -> Result<DateTime<Utc>, AppError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Utc::now())
        }

        async fn find_by_id(&self, _: i64) -> Result<Option<LinkRecord>, AppError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn find_by_url(&self, _: &str) -> Result<Option<LinkRecord>, AppError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn count(&self) -> Result<LinkCounts, AppError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(LinkCounts::default())
        }

        async fn list_pending(&self, _: i64) -> Result<Vec<PendingLink>, AppError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![])
        }

        async fn health_check(&self) -> bool {
            tokio::time::sleep(Duration::from_secs(5)).await;
            true
        }
    }

    fn fast_timeouts() -> ServiceSettings {
        ServiceSettings {
            store_timeout: Duration::from_millis(50),
            cache_timeout: Duration::from_millis(20),
            cache_ttl_seconds: None,
        }
    }

    #[tokio::test]
    async fn test_cache_timeout_is_a_miss() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        let service = LinkService::new(repo, Arc::new(SlowCache), fast_timeouts());

        let alias = service.create("https://example.com").await.unwrap();
        assert_eq!(service.resolve(&alias).await.unwrap(), "https://example.com");
    }

    #[tokio::test]
    async fn test_store_timeout_is_unavailable() {
        let service = LinkService::new(Arc::new(SlowRepository), Arc::new(NullCache), fast_timeouts());

        let err = service.resolve("1").await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable { .. }));

        let err = service.create("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_health_reports_each_collaborator() {
        let (service, _, _) = in_memory();
        assert_eq!(service.health().await, HealthStatus { db: true, redis: true });

        let service = LinkService::new(Arc::new(SlowRepository), Arc::new(failing_cache()), fast_timeouts());
        assert_eq!(service.health().await, HealthStatus { db: false, redis: false });

        let service = LinkService::new(
            Arc::new(InMemoryLinkRepository::new()),
            Arc::new(SlowCache),
            fast_timeouts(),
        );
        assert_eq!(service.health().await, HealthStatus { db: true, redis: false });
    }

    #[tokio::test]
    async fn test_repair_pending_attaches_aliases() {
        let (service, repo, cache) = in_memory();
        let a = repo.insert("https://example.com/a").await.unwrap();
        let b = repo.insert("https://example.com/b").await.unwrap();

        let repaired = service.repair_pending(10).await.unwrap();

        let aliases: Vec<&str> = repaired.iter().map(|l| l.alias.as_str()).collect();
        assert_eq!(aliases, vec!["1", "2"]);
        assert_eq!(repaired[0].id, a.id);
        assert_eq!(repaired[1].id, b.id);
        assert_eq!(service.counts().await.unwrap().pending, 0);
        assert!(cache.contains_alias("2"));
        assert_eq!(service.resolve("2").await.unwrap(), "https://example.com/b");
    }

    #[test]
    fn test_alias_for_rejects_non_positive_ids() {
        assert!(alias_for(0).is_err());
        assert!(alias_for(-5).is_err());
        assert_eq!(alias_for(1).unwrap(), "1");
    }
}
