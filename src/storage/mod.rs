//! Storage module for the persisted snapshot
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Atomic wholesale replacement of the snapshot after a crawl
//! - Read queries backing the search and lookup endpoints

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::path::Path;

/// Initializes or opens a snapshot database
pub fn open_storage(path: &Path) -> crate::Result<SqliteStorage> {
    Ok(SqliteStorage::open(path)?)
}

/// A movie row from the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRow {
    pub id: i64,
    pub title: String,
    pub rank: u32,
}

/// An actor row from the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorRow {
    pub id: i64,
    pub name: String,
}

/// Row counts of the three snapshot relations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotCounts {
    pub movies: u64,
    pub actors: u64,
    pub associations: u64,
}
