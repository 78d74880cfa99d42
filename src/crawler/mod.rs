//! Crawler module for fetching and extracting movie data
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry for transient network faults
//! - Listing and detail page parsing
//! - Two-phase, semaphore-bounded crawl orchestration

mod detail;
mod fetcher;
mod listing;
mod orchestrator;

pub use detail::{parse_actors, ActorStub, CAST_SECTION_LABEL};
pub use fetcher::{
    build_http_client, with_retry, FetchError, FetchResult, Fetcher, HttpFetcher, RetryPolicy,
};
pub use listing::{parse_listing_page, MovieStub};
pub use orchestrator::{crawl_top_movies, CrawlError, CrawlResult, MAX_PAGES};

use crate::config::Config;
use crate::storage::Storage;
use scraper::ElementRef;
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised when a page no longer matches the expected layout
///
/// Every variant is fatal for the whole crawl: a malformed entry is treated
/// as site-layout drift to be caught immediately, never skipped over.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("listing article missing {what}")]
    MissingListingElement { what: &'static str },

    #[error("could not parse rank from {text:?}")]
    InvalidRank { text: String },

    #[error("no numeric id in href {href:?}")]
    IdNotFound { href: String },

    #[error("cast container missing from detail page")]
    MissingCastContainer,

    #[error("actor link missing href")]
    MissingActorHref,
}

/// Collects an element's text content, trimmed
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Crawls the ranked movies and atomically replaces the stored snapshot.
///
/// This is the full pipeline behind both the crawl endpoint and the
/// `--crawl-once` CLI mode. The storage lock is only taken once the crawl
/// has fully succeeded, so a failed crawl leaves the previous snapshot
/// untouched and readers are never blocked by in-flight fetches.
pub async fn crawl_and_store<F, S>(
    fetcher: &F,
    config: &Config,
    pages: u32,
    storage: &Mutex<S>,
) -> crate::Result<()>
where
    F: Fetcher,
    S: Storage,
{
    tracing::info!(pages, "rebuilding the movie snapshot");
    let crawl = crawl_top_movies(
        fetcher,
        &config.source,
        config.crawler.max_concurrent_requests,
        pages,
    )
    .await?;
    tracing::info!("finished crawling movies");

    let mut storage = storage.lock().unwrap();
    storage.replace_snapshot(&crawl)?;
    Ok(())
}
