//! Crawl orchestration
//!
//! Drives the two-phase crawl: fan-out across the requested listing pages,
//! then fan-out across every discovered movie's detail page. Both phases
//! draw permits from one shared semaphore so the total number of in-flight
//! fetch+parse units never exceeds the configured ceiling, and both use
//! fail-fast joins so a single fatal error aborts the whole crawl with no
//! partial result.

use crate::config::SourceConfig;
use crate::crawler::detail::{parse_actors, ActorStub};
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::listing::{parse_listing_page, MovieStub};
use crate::crawler::ParseError;
use futures::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;

/// The site only exposes this many pages of rankings
pub const MAX_PAGES: u32 = 10;

/// Errors that abort a crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("pages to crawl must be between 1 and {max}, got {0}", max = MAX_PAGES)]
    PageCountOutOfRange(u32),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// One `(movie, starring actors)` pair per crawled movie, in listing rank
/// order across all requested pages
pub type CrawlResult = Vec<(MovieStub, Vec<ActorStub>)>;

/// Crawls the top-movies ranking.
///
/// Phase 1 fetches and parses `pages` listing pages concurrently; phase 2
/// fetches and parses one detail page per discovered movie, gated by the
/// same permit pool. The returned pairs are zipped positionally: phase-2
/// operations are issued in flattened stub order and `try_join_all` yields
/// their results in that same order.
///
/// # Arguments
///
/// * `fetcher` - Page source (the production HTTP fetcher, or a test double)
/// * `source` - Site addresses and paths
/// * `max_concurrent_requests` - Capacity of the shared permit pool
/// * `pages` - Number of listing pages to crawl, `1..=10`
pub async fn crawl_top_movies<F: Fetcher>(
    fetcher: &F,
    source: &SourceConfig,
    max_concurrent_requests: usize,
    pages: u32,
) -> Result<CrawlResult, CrawlError> {
    if !(1..=MAX_PAGES).contains(&pages) {
        return Err(CrawlError::PageCountOutOfRange(pages));
    }

    // One permit pool spans both phases. Constructed per invocation and
    // passed down explicitly; concurrent crawl calls do not share it.
    let semaphore = Arc::new(Semaphore::new(max_concurrent_requests));

    let listing_pages = try_join_all(
        (1..=pages).map(|page| crawl_listing_page(fetcher, source, Arc::clone(&semaphore), page)),
    )
    .await?;
    tracing::info!("finished crawling the ranked-movies listing");

    let movies: Vec<MovieStub> = listing_pages.into_iter().flatten().collect();

    let actors_per_movie = try_join_all(
        movies
            .iter()
            .map(|movie| fetch_movie_actors(fetcher, source, Arc::clone(&semaphore), movie)),
    )
    .await?;

    let distinct_actors: HashSet<i64> = actors_per_movie
        .iter()
        .flatten()
        .map(|actor| actor.id)
        .collect();
    tracing::info!(
        distinct_actors = distinct_actors.len(),
        "loaded actors for all movies"
    );

    Ok(movies.into_iter().zip(actors_per_movie).collect())
}

/// Computes the listing offset for a 1-based page number: page 1 starts at
/// offset 0, every later page at `(page - 1) * 100`.
fn page_offset(page: u32) -> u32 {
    if page == 1 {
        0
    } else {
        (page - 1) * 100
    }
}

async fn crawl_listing_page<F: Fetcher>(
    fetcher: &F,
    source: &SourceConfig,
    semaphore: Arc<Semaphore>,
    page: u32,
) -> Result<Vec<MovieStub>, CrawlError> {
    let url = format!(
        "{}{}{}",
        source.base_url.trim_end_matches('/'),
        source.listing_path,
        page_offset(page)
    );

    tracing::info!(page, "crawling listing page");
    let permit = semaphore.acquire().await.expect("semaphore closed");
    let body = fetcher.fetch(&url).await?;
    let movies = parse_listing_page(&String::from_utf8_lossy(&body))?;
    drop(permit);

    tracing::debug!(page, found_movies = movies.len(), "parsed listing page");
    Ok(movies)
}

async fn fetch_movie_actors<F: Fetcher>(
    fetcher: &F,
    source: &SourceConfig,
    semaphore: Arc<Semaphore>,
    movie: &MovieStub,
) -> Result<Vec<ActorStub>, CrawlError> {
    let url = format!(
        "{}{}",
        source.base_url.trim_end_matches('/'),
        movie.detail_path
    );

    let permit = semaphore.acquire().await.expect("semaphore closed");
    let body = fetcher.fetch(&url).await?;
    // Parsing stays under the permit: the parser is CPU-bound enough that
    // unbounded parse work alongside open requests causes timeouts.
    let actors = parse_actors(&String::from_utf8_lossy(&body))?;
    drop(permit);

    tracing::debug!(movie_id = movie.id, count = actors.len(), "parsed cast");
    Ok(actors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::FetchResult;
    use async_trait::async_trait;

    /// Fails the test if the orchestrator issues any fetch at all.
    struct PanicFetcher;

    #[async_trait]
    impl Fetcher for PanicFetcher {
        async fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
            panic!("unexpected fetch of {}", url);
        }
    }

    #[tokio::test]
    async fn test_page_count_zero_rejected_before_any_fetch() {
        let result = crawl_top_movies(&PanicFetcher, &SourceConfig::default(), 15, 0).await;
        assert!(matches!(result, Err(CrawlError::PageCountOutOfRange(0))));
    }

    #[tokio::test]
    async fn test_page_count_eleven_rejected_before_any_fetch() {
        let result = crawl_top_movies(&PanicFetcher, &SourceConfig::default(), 15, 11).await;
        assert!(matches!(result, Err(CrawlError::PageCountOutOfRange(11))));
    }

    #[test]
    fn test_page_offsets() {
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(2), 100);
        assert_eq!(page_offset(3), 200);
        assert_eq!(page_offset(10), 900);
    }
}
