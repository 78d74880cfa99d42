use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Returns the built-in default configuration, validated
///
/// Used when the binary is started without a config file argument.
pub fn default_config() -> Result<Config, ConfigError> {
    let config = Config::default();
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[server]
bind = "127.0.0.1:9000"

[source]
base-url = "https://movies.example.com"
listing-path = "/top/?from="
user-agent = "test-crawler/0.1"

[crawler]
max-concurrent-requests = 4
max-retry-attempts = 2
initial-backoff-secs = 1
max-backoff-secs = 5
request-timeout-secs = 10

[output]
database-path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.source.base_url, "https://movies.example.com");
        assert_eq!(config.crawler.max_concurrent_requests, 4);
        assert_eq!(config.output.database_path, "./test.db");
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config_content = r#"
[server]
bind = "0.0.0.0:3000"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert_eq!(config.crawler.max_concurrent_requests, 15);
        assert_eq!(config.crawler.max_retry_attempts, 5);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
max-concurrent-requests = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_default_config() {
        let config = default_config().unwrap();
        assert_eq!(config.crawler.max_concurrent_requests, 15);
    }
}
