//! Shortened link entity in its two lifecycle phases.

use chrono::{DateTime, Utc};

/// A freshly inserted record that has an id but no alias yet.
///
/// Only the store hands these out. Promote with [`PendingLink::into_link`] once the
/// alias has been attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLink {
    pub id: i64,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl PendingLink {
    pub fn new(id: i64, original_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            original_url,
            created_at,
        }
    }

    /// Promotes the record to an aliased [`Link`].
    pub fn into_link(self, alias: String, updated_at: DateTime<Utc>) -> Link {
        Link {
            id: self.id,
            original_url: self.original_url,
            alias,
            created_at: self.created_at,
            updated_at,
        }
    }
}

/// A record whose alias has been attached; the only shape reachable by resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub original_url: String,
    pub alias: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    pub fn new(
        id: i64,
        original_url: String,
        alias: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            alias,
            created_at,
            updated_at,
        }
    }
}

/// A record as read back from the store, in whichever phase it is in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRecord {
    Pending(PendingLink),
    Aliased(Link),
}

impl LinkRecord {
    /// Builds a record from nullable store columns.
    ///
    /// A row with an alias but no `updated_at` is treated as aliased at `created_at`.
    pub fn from_parts(
        id: i64,
        original_url: String,
        alias: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        match alias {
            Some(alias) => Self::Aliased(Link::new(
                id,
                original_url,
                alias,
                created_at,
                updated_at.unwrap_or(created_at),
            )),
            None => Self::Pending(PendingLink::new(id, original_url, created_at)),
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Pending(p) => p.id,
            Self::Aliased(l) => l.id,
        }
    }

    pub fn original_url(&self) -> &str {
        match self {
            Self::Pending(p) => &p.original_url,
            Self::Aliased(l) => &l.original_url,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            Self::Pending(_) => None,
            Self::Aliased(l) => Some(&l.alias),
        }
    }

    /// Returns the aliased link, or `None` while the record is still pending.
    pub fn into_aliased(self) -> Option<Link> {
        match self {
            Self::Pending(_) => None,
            Self::Aliased(l) => Some(l),
        }
    }
}
