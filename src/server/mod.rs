//! HTTP API server
//!
//! Thin axum boundary over the crawler and the snapshot store:
//! - `POST /crawl/load_movies_data` triggers a synchronous crawl+replace
//! - `GET /search`, `GET /movie/:id`, `GET /actor/:id` read the snapshot
//!
//! The snapshot is only ever mutated inside one storage transaction, so the
//! read handlers never observe a half-replaced dataset.

mod handlers;
mod types;

pub use handlers::ApiError;
pub use types::{Actor, ActorWithMovies, ErrorBody, Movie, MovieWithActors, MoviesAndActors};

use crate::config::Config;
use crate::crawler::{build_http_client, HttpFetcher, RetryPolicy};
use crate::storage::{open_storage, SqliteStorage};
use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Shared state for the API server
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Mutex<SqliteStorage>>,
    pub fetcher: Arc<HttpFetcher>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Opens the database and builds the HTTP client per the configuration.
    pub fn from_config(config: Config) -> crate::Result<Self> {
        let storage = open_storage(Path::new(&config.output.database_path))?;
        let client = build_http_client(&config.source, &config.crawler)?;
        let fetcher = HttpFetcher::new(client, RetryPolicy::from_config(&config.crawler));

        Ok(Self {
            storage: Arc::new(Mutex::new(storage)),
            fetcher: Arc::new(fetcher),
            config: Arc::new(config),
        })
    }
}

/// Creates the router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/crawl/load_movies_data", post(handlers::load_movies_data))
        .route("/search", get(handlers::search))
        .route("/movie/:id", get(handlers::get_movie))
        .route("/actor/:id", get(handlers::get_actor))
        .with_state(state)
}

/// Starts the API server and blocks until it shuts down
pub async fn serve(config: Config) -> crate::Result<()> {
    let bind = config.server.bind.clone();
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("listening on http://{}", bind);
    axum::serve(listener, app).await?;

    Ok(())
}
