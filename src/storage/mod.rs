//! Snapshot persistence for the meetup graph
//!
//! The recommendation core is storage-agnostic; this module provides the
//! SQLite-backed snapshot the CLI uses between runs.

mod sqlite;

pub use sqlite::{SqliteStore, StorageError, StorageResult};
