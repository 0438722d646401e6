//! HTTP request handlers for API endpoints.

pub mod generator;
pub mod health;

pub use generator::{generate_handler, resolve_handler};
pub use health::health_handler;
