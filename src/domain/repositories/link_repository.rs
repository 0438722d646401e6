//! Repository trait for the record store of shortened links.

use crate::domain::entities::{LinkRecord, PendingLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Row counts reported by [`LinkRepository::count`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCounts {
    pub total: i64,
    pub pending: i64,
}

/// Durable, authoritative store of shortened links.
///
/// The store assigns ids: strictly increasing, gaps allowed, never reused.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - Process-local implementation
/// - Test mocks available with `cfg(test)`
///
/// # Errors
///
/// Every method returns [`AppError::Unavailable`] when the store cannot be
/// reached and [`AppError::Internal`] on other database errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new record and returns it with its freshly assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the store enforces URL uniqueness and the
    /// URL is already present.
    async fn insert(&self, original_url: &str) -> Result<PendingLink, AppError>;

    /// Attaches the alias to a record and returns the new `updated_at`.
    ///
    /// Repeating the call with the same pair only refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    async fn attach_alias(&self, id: i64, alias: &str) -> Result<DateTime<Utc>, AppError>;

    /// Finds a record by id, in whichever phase it is in.
    async fn find_by_id(&self, id: i64) -> Result<Option<LinkRecord>, AppError>;

    /// Finds the record for an original URL; the lowest id wins if several exist.
    async fn find_by_url(&self, original_url: &str) -> Result<Option<LinkRecord>, AppError>;

    /// Counts all records and the ones still waiting for an alias.
    async fn count(&self) -> Result<LinkCounts, AppError>;

    /// Lists up to `limit` records that never got an alias, oldest first.
    async fn list_pending(&self, limit: i64) -> Result<Vec<PendingLink>, AppError>;

    /// Probes store connectivity. Never fails; `false` means unreachable.
    async fn health_check(&self) -> bool;
}
