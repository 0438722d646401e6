//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and caching.
//!
//! # Modules
//!
//! - [`cache`] - Cache accelerator adapters (Redis, in-memory, no-op)
//! - [`persistence`] - Record store adapters (PostgreSQL, in-memory)

pub mod cache;
pub mod persistence;
