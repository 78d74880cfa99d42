//! Filmrank: a movie-ranking crawler and search API
//!
//! This crate crawls the ranked-movies listing of a movie database site,
//! extracts movie and cast data, persists it as an atomically-replaced
//! SQLite snapshot, and serves a small read/search HTTP API over it.

pub mod config;
pub mod crawler;
pub mod server;
pub mod storage;
pub mod text;

use thiserror::Error;

/// Main error type for Filmrank operations
#[derive(Debug, Error)]
pub enum FilmrankError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] crawler::CrawlError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Filmrank operations
pub type Result<T> = std::result::Result<T, FilmrankError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl_top_movies, ActorStub, CrawlResult, MovieStub};
pub use text::normalize;
