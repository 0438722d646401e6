//! Utility functions shared across layers.
//!
//! - [`base62`] - Conversion between record ids and public aliases

pub mod base62;
