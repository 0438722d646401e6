//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{LinkRecord, PendingLink};
use crate::domain::repositories::{LinkCounts, LinkRepository};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    original_url: String,
    alias: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for LinkRecord {
    fn from(r: LinkRow) -> Self {
        LinkRecord::from_parts(r.id, r.original_url, r.alias, r.created_at, r.updated_at)
    }
}

#[derive(sqlx::FromRow)]
struct PendingRow {
    id: i64,
    original_url: String,
    created_at: DateTime<Utc>,
}

impl From<PendingRow> for PendingLink {
    fn from(r: PendingRow) -> Self {
        PendingLink::new(r.id, r.original_url, r.created_at)
    }
}

/// PostgreSQL repository for shortened links.
///
/// Ids come from the `BIGSERIAL` sequence, so they are monotonic and never reused
/// even when a transaction rolls back (leaving a gap). `original_url` carries a
/// unique index; a second insert of the same URL fails with [`AppError::Conflict`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, original_url: &str) -> Result<PendingLink, AppError> {
        let row = sqlx::query_as::<_, PendingRow>(
            r#"
            INSERT INTO shortened_links (original_url)
            VALUES ($1)
            RETURNING id, original_url, created_at
            "#,
        )
        .bind(original_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn attach_alias(&self, id: i64, alias: &str) -> Result<DateTime<Utc>, AppError> {
        let updated_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            UPDATE shortened_links
            SET alias = $2, updated_at = now()
            WHERE id = $1
            RETURNING updated_at
            "#,
        )
        .bind(id)
        .bind(alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        updated_at.ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LinkRecord>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, alias, created_at, updated_at
            FROM shortened_links
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_url(&self, original_url: &str) -> Result<Option<LinkRecord>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, alias, created_at, updated_at
            FROM shortened_links
            WHERE md5(original_url) = md5($1) AND original_url = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn count(&self) -> Result<LinkCounts, AppError> {
        let (total, pending) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE alias IS NULL)
            FROM shortened_links
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(LinkCounts { total, pending })
    }

    async fn list_pending(&self, limit: i64) -> Result<Vec<PendingLink>, AppError> {
        let rows = sqlx::query_as::<_, PendingRow>(
            r#"
            SELECT id, original_url, created_at
            FROM shortened_links
            WHERE alias IS NULL
            ORDER BY id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
