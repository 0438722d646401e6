//! In-memory implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{LinkRecord, PendingLink};
use crate::domain::repositories::{LinkCounts, LinkRepository};
use crate::error::AppError;

#[derive(Debug, Clone)]
struct Row {
    original_url: String,
    alias: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Row {
    fn to_record(&self, id: i64) -> LinkRecord {
        LinkRecord::from_parts(
            id,
            self.original_url.clone(),
            self.alias.clone(),
            self.created_at,
            self.updated_at,
        )
    }
}

/// Process-local record store backed by `DashMap`.
///
/// Used by tests and for running the service without PostgreSQL. Ids come from an
/// atomic counter starting at 1. By default duplicate URLs are accepted (the
/// lowest id stays indexed); [`InMemoryLinkRepository::with_unique_urls`] rejects
/// them with [`AppError::Conflict`] like the PostgreSQL schema does.
#[derive(Debug)]
pub struct InMemoryLinkRepository {
    rows: DashMap<i64, Row>,
    url_index: DashMap<String, i64>,
    next_id: AtomicI64,
    unique_urls: bool,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            url_index: DashMap::new(),
            next_id: AtomicI64::new(1),
            unique_urls: false,
        }
    }

    /// Creates a store that enforces one row per original URL.
    pub fn with_unique_urls() -> Self {
        Self {
            unique_urls: true,
            ..Self::new()
        }
    }

    /// Number of stored rows for `original_url`, duplicates included.
    pub fn rows_for_url(&self, original_url: &str) -> usize {
        self.rows
            .iter()
            .filter(|r| r.original_url == original_url)
            .count()
    }

    fn allocate(&self, original_url: &str) -> PendingLink {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created_at = Utc::now();

        self.rows.insert(
            id,
            Row {
                original_url: original_url.to_string(),
                alias: None,
                created_at,
                updated_at: None,
            },
        );

        PendingLink::new(id, original_url.to_string(), created_at)
    }
}

impl Default for InMemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, original_url: &str) -> Result<PendingLink, AppError> {
        match self.url_index.entry(original_url.to_string()) {
            Entry::Occupied(mut slot) => {
                if self.unique_urls {
                    return Err(AppError::conflict(
                        "Unique constraint violation",
                        json!({ "constraint": "shortened_links_original_url_key" }),
                    ));
                }
                let pending = self.allocate(original_url);
                if pending.id < *slot.get() {
                    slot.insert(pending.id);
                }
                Ok(pending)
            }
            Entry::Vacant(slot) => {
                let pending = self.allocate(original_url);
                slot.insert(pending.id);
                Ok(pending)
            }
        }
    }

    async fn attach_alias(&self, id: i64, alias: &str) -> Result<DateTime<Utc>, AppError> {
        let mut row = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        let updated_at = Utc::now();
        row.alias = Some(alias.to_string());
        row.updated_at = Some(updated_at);

        Ok(updated_at)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LinkRecord>, AppError> {
        Ok(self.rows.get(&id).map(|row| row.to_record(id)))
    }

    async fn find_by_url(&self, original_url: &str) -> Result<Option<LinkRecord>, AppError> {
        let Some(id) = self.url_index.get(original_url).map(|entry| *entry) else {
            return Ok(None);
        };

        self.find_by_id(id).await
    }

    async fn count(&self) -> Result<LinkCounts, AppError> {
        let total = self.rows.len() as i64;
        let pending = self.rows.iter().filter(|r| r.alias.is_none()).count() as i64;

        Ok(LinkCounts { total, pending })
    }

    async fn list_pending(&self, limit: i64) -> Result<Vec<PendingLink>, AppError> {
        let mut pending: Vec<PendingLink> = self
            .rows
            .iter()
            .filter(|r| r.alias.is_none())
            .map(|r| PendingLink::new(*r.key(), r.original_url.clone(), r.created_at))
            .collect();

        pending.sort_by_key(|p| p.id);
        pending.truncate(limit.max(0) as usize);

        Ok(pending)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
