use serde::Deserialize;

/// Main configuration structure for Filmrank
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            source: SourceConfig::default(),
            crawler: CrawlerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the API server binds to (host:port)
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Configuration of the crawled site
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the movie database site
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the ranked-movies listing; the page offset is appended
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.csfd.cz".to_string(),
            listing_path: "/zebricky/filmy/nejlepsi/?from=".to_string(),
            user_agent: "filmrank/1.0".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Ceiling on simultaneous in-flight fetch+parse units, shared across
    /// both crawl phases
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: usize,

    /// Total attempts per request before a transient fault becomes fatal
    #[serde(rename = "max-retry-attempts")]
    pub max_retry_attempts: u32,

    /// First retry delay (seconds)
    #[serde(rename = "initial-backoff-secs")]
    pub initial_backoff_secs: u64,

    /// Upper bound on any single retry delay (seconds)
    #[serde(rename = "max-backoff-secs")]
    pub max_backoff_secs: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            // The HTML parser is CPU-bound enough that oversubscription
            // causes request timeouts, so this gates parsing too.
            max_concurrent_requests: 15,
            max_retry_attempts: 5,
            initial_backoff_secs: 3,
            max_backoff_secs: 30,
            request_timeout_secs: 30,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./crawled.db".to_string(),
        }
    }
}
