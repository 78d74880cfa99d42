//! Configuration module for Filmrank
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every table has sensible defaults, so a missing config file (or a
//! partial one) still yields a runnable configuration.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, ServerConfig, SourceConfig};

// Re-export parser functions
pub use parser::{default_config, load_config};

// Re-export validation
pub use validation::validate;
