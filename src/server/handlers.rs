//! Endpoint handlers and error mapping

use crate::crawler::{crawl_and_store, CrawlError};
use crate::server::types::{
    Actor, ActorWithMovies, ErrorBody, Movie, MovieWithActors, MoviesAndActors,
};
use crate::server::AppState;
use crate::storage::{Storage, StorageError};
use crate::text::normalize;
use crate::FilmrankError;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

/// Error responses of the API, mapped per failure class
#[derive(Debug)]
pub enum ApiError {
    /// Caller-supplied parameter out of range
    Validation(String),

    /// The source site could not be crawled
    Unavailable(String),

    /// Requested row does not exist
    NotFound(&'static str),

    /// Anything else; detail is logged, not leaked
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unavailable(message) => (StatusCode::SERVICE_UNAVAILABLE, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<FilmrankError> for ApiError {
    fn from(err: FilmrankError) -> Self {
        match err {
            FilmrankError::Crawl(crawl) => crawl.into(),
            other => {
                tracing::error!(error = %other, "request failed");
                ApiError::Internal("internal error".to_string())
            }
        }
    }
}

impl From<CrawlError> for ApiError {
    fn from(err: CrawlError) -> Self {
        match &err {
            CrawlError::PageCountOutOfRange(_) => ApiError::Validation(err.to_string()),
            CrawlError::Fetch(fetch) => {
                tracing::error!(error = %fetch, "upstream fetch failed");
                ApiError::Unavailable("HTTP request to the movie site failed".to_string())
            }
            CrawlError::Parse(parse) => {
                tracing::error!(error = %parse, "crawl aborted, page layout changed");
                ApiError::Internal("crawl failed: unexpected page layout".to_string())
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "storage operation failed");
        ApiError::Internal("internal error".to_string())
    }
}

/// Health check endpoint
pub async fn health() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct CrawlParams {
    #[serde(default = "default_pages_to_crawl")]
    pub pages_to_crawl: u32,
}

fn default_pages_to_crawl() -> u32 {
    1
}

/// `POST /crawl/load_movies_data` — runs a full crawl synchronously and
/// replaces the snapshot; 204 on success.
pub async fn load_movies_data(
    State(state): State<AppState>,
    Query(params): Query<CrawlParams>,
) -> Result<StatusCode, ApiError> {
    crawl_and_store(
        state.fetcher.as_ref(),
        &state.config,
        params.pages_to_crawl,
        &state.storage,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

/// `GET /search` — case- and diacritic-insensitive substring search over
/// movie titles and actor names.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<MoviesAndActors>, ApiError> {
    if params.query.is_empty() {
        return Err(ApiError::Validation("query must not be empty".to_string()));
    }

    let normalized = normalize(&params.query);
    let storage = state.storage.lock().unwrap();
    let (movies, actors) = storage.search(&normalized)?;

    Ok(Json(MoviesAndActors {
        movies: movies.into_iter().map(Movie::from).collect(),
        actors: actors.into_iter().map(Actor::from).collect(),
    }))
}

/// `GET /movie/:id`
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> Result<Json<MovieWithActors>, ApiError> {
    let storage = state.storage.lock().unwrap();
    let (movie, actors) = storage
        .movie_with_actors(movie_id)?
        .ok_or(ApiError::NotFound("Movie not found"))?;

    Ok(Json(MovieWithActors {
        movie: movie.into(),
        actors: actors.into_iter().map(Actor::from).collect(),
    }))
}

/// `GET /actor/:id`
pub async fn get_actor(
    State(state): State<AppState>,
    Path(actor_id): Path<i64>,
) -> Result<Json<ActorWithMovies>, ApiError> {
    let storage = state.storage.lock().unwrap();
    let (actor, movies) = storage
        .actor_with_movies(actor_id)?
        .ok_or(ApiError::NotFound("Actor not found"))?;

    Ok(Json(ActorWithMovies {
        actor: actor.into(),
        movies: movies.into_iter().map(Movie::from).collect(),
    }))
}
