//! HTTP fetcher with retry
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building an HTTP client with proper user agent and timeouts
//! - GET requests with transparent redirect following
//! - Retry with exponential, jittered backoff for transient network faults
//! - Error classification (transient network faults vs fatal HTTP statuses)
//!
//! The target site drops connections instead of returning 429 when it is
//! throttling, so mid-transfer network faults are treated as retryable while
//! real HTTP error statuses are immediately fatal.

use crate::config::{CrawlerConfig, SourceConfig};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by a fetch operation
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transient network-layer fault (connection dropped, timeout, body cut
    /// mid-transfer). Recovered locally via retry.
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        source: reqwest::Error,
    },

    /// Non-2xx HTTP response. Never retried.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// All retry attempts on transient faults were used up.
    #[error("giving up on {url} after {attempts} attempts: {source}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Whether this error may succeed on a retry
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Network { .. })
    }
}

/// Result type for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Retry behavior for one logical fetch
///
/// The retryable classification is an explicit field rather than something
/// baked into the retry loop, so tests can drive `with_retry` with their own
/// error types and predicates.
pub struct RetryPolicy<E = FetchError> {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_backoff: Duration,

    /// Upper bound on any single delay, jitter included
    pub max_backoff: Duration,

    /// Classifies which errors are worth retrying
    pub is_retryable: fn(&E) -> bool,
}

impl Default for RetryPolicy<FetchError> {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(3),
            max_backoff: Duration::from_secs(30),
            is_retryable: FetchError::is_transient,
        }
    }
}

impl RetryPolicy<FetchError> {
    /// Builds the production policy from crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_attempts: config.max_retry_attempts,
            initial_backoff: Duration::from_secs(config.initial_backoff_secs),
            max_backoff: Duration::from_secs(config.max_backoff_secs),
            is_retryable: FetchError::is_transient,
        }
    }
}

impl<E> RetryPolicy<E> {
    /// Delay before the retry following the given failed attempt (1-based):
    /// exponential growth from `initial_backoff` plus up to a second of
    /// jitter, capped at `max_backoff`.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let shift = (attempt - 1).min(16);
        let exponential = self.initial_backoff.saturating_mul(1u32 << shift);
        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..1000));
        (exponential + jitter).min(self.max_backoff)
    }
}

/// Runs an operation, retrying per the policy
///
/// Errors the policy classifies as retryable are attempted up to
/// `max_attempts` times with a backoff sleep between attempts; anything else
/// is returned immediately. On exhaustion the last error is returned.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy<E>, mut operation: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if (policy.is_retryable)(&error) && attempt < policy.max_attempts => {
                tracing::warn!(attempt, error = %error, "transient fetch error, retrying");
                tokio::time::sleep(policy.backoff_delay(attempt)).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

/// A source of page bytes
///
/// The orchestrator is generic over this so tests can substitute
/// instrumented or failing fetchers for the real HTTP client.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches one URL, following redirects, and returns the response body.
    async fn fetch(&self, url: &str) -> FetchResult<Vec<u8>>;
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed transparently (reqwest's default policy); gzip and
/// brotli are negotiated; timeouts come from the crawler configuration.
pub fn build_http_client(
    source: &SourceConfig,
    config: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&source.user_agent)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production fetcher: a reqwest client wrapped in the retry policy
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy<FetchError>,
}

impl HttpFetcher {
    pub fn new(client: Client, policy: RetryPolicy<FetchError>) -> Self {
        Self { client, policy }
    }

    /// One attempt: GET the URL and read the full body
    async fn fetch_once(client: &Client, url: &str) -> FetchResult<Vec<u8>> {
        tracing::debug!(url, "requesting page");
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(url, status = status.as_u16(), body = %body, "HTTP request failed");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        // A connection cut while streaming the body surfaces here and is
        // just as retryable as one cut before the headers.
        let bytes = response
            .bytes()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
        match with_retry(&self.policy, || Self::fetch_once(&self.client, url)).await {
            Err(FetchError::Network { url, source }) => Err(FetchError::RetriesExhausted {
                url,
                attempts: self.policy.max_attempts,
                source,
            }),
            other => other,
        }
    }
}
