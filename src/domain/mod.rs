//! Domain layer containing business entities and repository contracts.
//!
//! - [`entities`] - Link records in their pending and aliased phases
//! - [`repositories`] - Record store trait implemented by the infrastructure layer
//!
//! The domain layer has no dependency on the HTTP layer or on any concrete store.

pub mod entities;
pub mod repositories;
