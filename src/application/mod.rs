//! Application layer services implementing business logic.
//!
//! Services consume the repository and cache traits and give HTTP handlers and
//! the admin CLI a small API.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Alias creation, resolution, and repair

pub mod services;
