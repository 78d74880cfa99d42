//! SQLite storage implementation

use crate::crawler::{ActorStub, CrawlResult};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::{ActorRow, MovieRow, SnapshotCounts};
use crate::text::normalize;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the snapshot database at the given path
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    fn replace_snapshot(&mut self, crawl: &CrawlResult) -> StorageResult<()> {
        // Deduplicated union of actors across all movies; for duplicated ids
        // the first-seen name wins.
        let mut seen = HashSet::new();
        let mut actors: Vec<&ActorStub> = Vec::new();
        for (_, cast) in crawl {
            for actor in cast {
                if seen.insert(actor.id) {
                    actors.push(actor);
                }
            }
        }

        tracing::info!(
            movies = crawl.len(),
            actors = actors.len(),
            "replacing snapshot"
        );

        let tx = self.conn.transaction()?;

        // Associations go first, then the rows they reference.
        tracing::debug!("deleting existing movie-actor associations");
        tx.execute("DELETE FROM movie_actors", [])?;
        tracing::debug!("deleting existing movies");
        tx.execute("DELETE FROM movies", [])?;
        tracing::debug!("deleting existing actors");
        tx.execute("DELETE FROM actors", [])?;

        {
            let mut insert_movie = tx.prepare(
                "INSERT INTO movies (id, title, normalized_title, rank) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (movie, _) in crawl {
                insert_movie.execute(params![
                    movie.id,
                    movie.title,
                    normalize(&movie.title),
                    movie.rank
                ])?;
            }

            let mut insert_actor = tx
                .prepare("INSERT INTO actors (id, name, normalized_name) VALUES (?1, ?2, ?3)")?;
            for actor in &actors {
                insert_actor.execute(params![actor.id, actor.name, normalize(&actor.name)])?;
            }

            let mut insert_association =
                tx.prepare("INSERT INTO movie_actors (movie_id, actor_id) VALUES (?1, ?2)")?;
            for (movie, cast) in crawl {
                for actor in cast {
                    insert_association.execute(params![movie.id, actor.id])?;
                }
            }
        }

        // Dropping an uncommitted rusqlite transaction rolls it back, so any
        // `?` above leaves the previous snapshot fully intact.
        tx.commit()?;
        tracing::debug!("snapshot committed");
        Ok(())
    }

    fn search(&self, normalized_query: &str) -> StorageResult<(Vec<MovieRow>, Vec<ActorRow>)> {
        let pattern = format!("%{}%", normalized_query);

        let mut stmt = self.conn.prepare(
            "SELECT id, title, rank FROM movies WHERE normalized_title LIKE ?1 ORDER BY rank",
        )?;
        let movies = stmt
            .query_map(params![pattern], |row| {
                Ok(MovieRow {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    rank: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT id, name FROM actors WHERE normalized_name LIKE ?1 ORDER BY name",
        )?;
        let actors = stmt
            .query_map(params![pattern], |row| {
                Ok(ActorRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((movies, actors))
    }

    fn movie_with_actors(
        &self,
        movie_id: i64,
    ) -> StorageResult<Option<(MovieRow, Vec<ActorRow>)>> {
        let movie = self
            .conn
            .query_row(
                "SELECT id, title, rank FROM movies WHERE id = ?1",
                params![movie_id],
                |row| {
                    Ok(MovieRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        rank: row.get(2)?,
                    })
                },
            )
            .optional()?;

        let Some(movie) = movie else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.name FROM actors a
             JOIN movie_actors ma ON ma.actor_id = a.id
             WHERE ma.movie_id = ?1
             ORDER BY a.name",
        )?;
        let actors = stmt
            .query_map(params![movie_id], |row| {
                Ok(ActorRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some((movie, actors)))
    }

    fn actor_with_movies(
        &self,
        actor_id: i64,
    ) -> StorageResult<Option<(ActorRow, Vec<MovieRow>)>> {
        let actor = self
            .conn
            .query_row(
                "SELECT id, name FROM actors WHERE id = ?1",
                params![actor_id],
                |row| {
                    Ok(ActorRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;

        let Some(actor) = actor else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.title, m.rank FROM movies m
             JOIN movie_actors ma ON ma.movie_id = m.id
             WHERE ma.actor_id = ?1
             ORDER BY m.rank",
        )?;
        let movies = stmt
            .query_map(params![actor_id], |row| {
                Ok(MovieRow {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    rank: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some((actor, movies)))
    }

    fn snapshot_counts(&self) -> StorageResult<SnapshotCounts> {
        let movies: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        let actors: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM actors", [], |row| row.get(0))?;
        let associations: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM movie_actors", [], |row| row.get(0))?;

        Ok(SnapshotCounts {
            movies: movies as u64,
            actors: actors as u64,
            associations: associations as u64,
        })
    }
}
