//! Core domain entities.
//!
//! A shortened link goes through two phases:
//!
//! - [`PendingLink`] - inserted, id assigned, alias not yet attached
//! - [`Link`] - alias attached; terminal state
//!
//! [`LinkRecord`] is what a store lookup returns when either phase is possible.

pub mod link;

pub use link::{Link, LinkRecord, PendingLink};
