//! Filmrank main entry point
//!
//! This is the command-line interface for the Filmrank crawler and API
//! server.

use clap::Parser;
use filmrank::config::{default_config, load_config, Config};
use filmrank::crawler::{build_http_client, crawl_and_store, HttpFetcher, RetryPolicy};
use filmrank::storage::{open_storage, Storage};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filmrank: a movie-ranking crawler and search API
///
/// Filmrank crawls the ranked-movies listing of a movie database site,
/// stores the movies and their casts as a SQLite snapshot, and serves a
/// small search/lookup HTTP API over it.
#[derive(Parser, Debug)]
#[command(name = "filmrank")]
#[command(version = "1.0.0")]
#[command(about = "A movie-ranking crawler and search API", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl the given number of listing pages, replace the snapshot, and exit
    #[arg(long, value_name = "PAGES", conflicts_with = "stats")]
    crawl_once: Option<u32>,

    /// Show snapshot statistics from the database and exit
    #[arg(long, conflicts_with = "crawl_once")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => default_config()?,
    };

    if let Some(pages) = cli.crawl_once {
        handle_crawl_once(config, pages).await?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        filmrank::server::serve(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("filmrank=info,warn"),
            1 => EnvFilter::new("filmrank=debug,info"),
            2 => EnvFilter::new("filmrank=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --crawl-once mode: one crawl+replace, then exit
async fn handle_crawl_once(config: Config, pages: u32) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let client = build_http_client(&config.source, &config.crawler)?;
    let fetcher = HttpFetcher::new(client, RetryPolicy::from_config(&config.crawler));

    let storage = Mutex::new(storage);
    crawl_and_store(&fetcher, &config, pages, &storage).await?;

    let counts = storage.lock().unwrap().snapshot_counts()?;
    println!(
        "✓ Crawl finished: {} movies, {} actors, {} associations",
        counts.movies, counts.actors, counts.associations
    );

    Ok(())
}

/// Handles the --stats mode: shows snapshot statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let counts = storage.snapshot_counts()?;

    println!("Database: {}\n", config.output.database_path);
    println!("Movies:       {}", counts.movies);
    println!("Actors:       {}", counts.actors);
    println!("Associations: {}", counts.associations);

    Ok(())
}
