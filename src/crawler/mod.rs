//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a per-request timeout
//! - HTML link extraction
//! - The page callback capability
//! - Per-URL crawl units and the worker pool that runs them
//! - Frontier bookkeeping and overall crawl coordination

mod callback;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod pool;
mod unit;

pub use callback::PageCallback;
pub use coordinator::{Coordinator, CoordinatorBuilder, CrawlOutcome, CrawlReport, CrawlState};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use parser::{extract_links, HtmlLinkExtractor, LinkExtractor};
pub use pool::{PoolError, UnitReport, WorkerPool};
pub use unit::{CrawlUnit, UnitError, UnitOutput};

use crate::config::Config;
use crate::ScraperError;
use std::hash::Hash;

/// Runs a complete crawl from a loaded configuration
///
/// Uses the HTTP fetcher and HTML link extractor with the configured user
/// agent, and the configured seeds.
///
/// # Example
///
/// ```no_run
/// use ripple_scraper::config::Config;
/// use ripple_scraper::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     seeds: vec!["https://example.com/".to_string()],
///     ..Config::default()
/// };
/// let report = crawl(&config, |text: &str| -> Vec<usize> { vec![text.len()] }).await?;
/// println!("{} distinct page sizes", report.results.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl<T, C>(config: &Config, callback: C) -> Result<CrawlReport<T>, ScraperError>
where
    T: Eq + Hash + std::fmt::Debug + Send + 'static,
    C: PageCallback<T> + 'static,
{
    let coordinator = Coordinator::builder(config.crawler.clone())
        .user_agent(config.user_agent.clone())
        .callback(callback)
        .build()?;
    coordinator.run(&config.seeds).await
}
