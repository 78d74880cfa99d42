//! JSON bodies for the read API

use crate::storage::{ActorRow, MovieRow};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub rank: u32,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            rank: row.rank,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Actor {
    pub id: i64,
    pub name: String,
}

impl From<ActorRow> for Actor {
    fn from(row: ActorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieWithActors {
    pub movie: Movie,
    pub actors: Vec<Actor>,
}

#[derive(Debug, Serialize)]
pub struct ActorWithMovies {
    pub actor: Actor,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize)]
pub struct MoviesAndActors {
    pub movies: Vec<Movie>,
    pub actors: Vec<Actor>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}
