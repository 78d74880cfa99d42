//! Storage trait and error types

use crate::crawler::CrawlResult;
use crate::storage::{ActorRow, MovieRow, SnapshotCounts};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for snapshot storage backends
///
/// One implementation exists in production (`SqliteStorage`); the trait is
/// the seam that lets crawl-pipeline tests record or reject writes.
pub trait Storage {
    /// Atomically replaces the whole persisted snapshot with a crawl result.
    ///
    /// Readers observe either the previous snapshot or the new one in full,
    /// never a mix; any failure leaves the previous snapshot intact.
    fn replace_snapshot(&mut self, crawl: &CrawlResult) -> StorageResult<()>;

    /// Substring search over the normalized title/name columns.
    ///
    /// The query must already be normalized (see [`crate::text::normalize`]).
    fn search(&self, normalized_query: &str) -> StorageResult<(Vec<MovieRow>, Vec<ActorRow>)>;

    /// A movie and its cast, or `None` if the id has no row.
    fn movie_with_actors(&self, movie_id: i64)
        -> StorageResult<Option<(MovieRow, Vec<ActorRow>)>>;

    /// An actor and the movies they starred in, or `None` if the id has no row.
    fn actor_with_movies(&self, actor_id: i64)
        -> StorageResult<Option<(ActorRow, Vec<MovieRow>)>>;

    /// Row counts of the three relations.
    fn snapshot_counts(&self) -> StorageResult<SnapshotCounts>;
}
