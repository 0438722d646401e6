//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract; implementations live in
//! `crate::infrastructure::persistence`. Mocks are generated with `mockall` for
//! unit tests.
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod link_repository;

pub use link_repository::{LinkCounts, LinkRepository};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
