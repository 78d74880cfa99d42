use crate::config::types::{Config, CrawlerConfig, OutputConfig, ServerConfig, SourceConfig};
use crate::ConfigError;
use std::net::SocketAddr;
use std::path::Path;
use url::Url;

/// File extensions accepted for the SQLite database path
const DATABASE_EXTENSIONS: &[&str] = &["sqlite", "db", "sqlite3"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_source_config(&config.source)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("bind must be a host:port address, got '{}': {}", config.bind, e))
    })?;
    Ok(())
}

/// Validates source configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.listing_path.is_empty() {
        return Err(ConfigError::Validation(
            "listing-path cannot be empty".to_string(),
        ));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-requests must be >= 1, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.max_retry_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retry-attempts must be >= 1, got {}",
            config.max_retry_attempts
        )));
    }

    if config.initial_backoff_secs > config.max_backoff_secs {
        return Err(ConfigError::Validation(format!(
            "initial-backoff-secs ({}) cannot exceed max-backoff-secs ({})",
            config.initial_backoff_secs, config.max_backoff_secs
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
///
/// The database path is restricted to a small extension allow-list so a typo
/// cannot silently create (or clobber) an unrelated file at startup.
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    let path = Path::new(&config.database_path);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension {
        Some(ext) if DATABASE_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => {
            return Err(ConfigError::Validation(format!(
                "database-path extension must be one of .sqlite, .db, .sqlite3, got '{}'",
                config.database_path
            )));
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(ConfigError::Validation(format!(
                "database-path directory does not exist: {}",
                parent.display()
            )));
        }
    }

    Ok(())
}
