//! Ripple-Scraper main entry point
//!
//! This is the command-line interface for the Ripple-Scraper crawler.

use clap::Parser;
use ripple_scraper::config::{load_config_with_hash, validate, Config, ExtractKind};
use ripple_scraper::crawler::{Coordinator, CrawlOutcome};
use ripple_scraper::extract::callback_from_config;
use ripple_scraper::output::{print_statistics, sorted_results, write_results, CrawlStatistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Ripple-Scraper: a breadth-first web scraper
///
/// Ripple-Scraper crawls outward from the seed URLs, following every
/// absolute http(s) link, and collects the values the page extractor finds
/// (Bitcoin addresses by default, or matches of a regular expression).
#[derive(Parser, Debug)]
#[command(name = "ripple-scraper")]
#[command(version)]
#[command(about = "A breadth-first web scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL (repeatable; added to any seeds in the config file)
    #[arg(short, long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Number of concurrent workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-fetch timeout in seconds
    #[arg(short, long)]
    timeout: Option<f64>,

    /// Stop enqueueing links after this many URLs have been visited
    #[arg(long)]
    max_pages: Option<usize>,

    /// Extract matches of this regular expression instead of Bitcoin addresses
    #[arg(long)]
    pattern: Option<String>,

    /// Write the final results to this file, one per line
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log per-round progress lines at debug instead of info
    #[arg(long)]
    quiet_progress: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e);
        }
    };

    if config.seeds.is_empty() {
        return Err("no seed URLs given (use --seed or `seeds` in the config file)".into());
    }

    handle_crawl(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_scraper=info,warn"),
            1 => EnvFilter::new("ripple_scraper=debug,info"),
            2 => EnvFilter::new("ripple_scraper=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    config.seeds.extend(cli.seeds.iter().cloned());
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout = timeout;
    }
    if cli.max_pages.is_some() {
        config.crawler.max_pages = cli.max_pages;
    }
    if let Some(pattern) = &cli.pattern {
        config.extract.kind = ExtractKind::Pattern;
        config.extract.pattern = Some(pattern.clone());
    }
    if let Some(output) = &cli.output {
        config.output.results_path = Some(output.display().to_string());
    }
    if cli.quiet_progress {
        config.crawler.verbose = false;
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Total seed URLs: {}, workers: {}, timeout: {}s",
        config.seeds.len(),
        config.crawler.workers,
        config.crawler.request_timeout
    );

    let callback = callback_from_config(&config.extract)?;
    let coordinator: Coordinator<String> = Coordinator::builder(config.crawler.clone())
        .user_agent(config.user_agent.clone())
        .callback(callback)
        .build()?;

    // Ctrl-C stops dispatching; the partial result set is still reported
    let token = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current batch");
            token.cancel();
        }
    });

    let report = coordinator.run(&config.seeds).await?;

    if let CrawlOutcome::Aborted { reason } = &report.outcome {
        tracing::error!("Crawl aborted: {}", reason);
    }

    if let Some(path) = &config.output.results_path {
        let written = write_results(Path::new(path), &report.results)?;
        tracing::info!("Wrote {} results to {}", written, path);
    }

    if !quiet {
        for result in sorted_results(&report.results) {
            println!("{}", result);
        }
        println!("{}", report.results.len());
        println!();
        print_statistics(&CrawlStatistics::from_report(&report));
    }

    Ok(())
}
