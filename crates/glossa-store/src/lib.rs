//! # glossa-store
//!
//! Read-only translation store backed by a set of SQLite replicas.

pub mod store;

pub use store::SqliteStore;

/// Schema of the `translation` table every replica must carry.
pub const SCHEMA: &str = include_str!("../migrations/001_translation.sql");
