//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns all crawl state (visited set, queue, result set) and
//! is the only place that mutates it. Each round it takes up to `workers`
//! URLs off the queue, hands them to the worker pool, waits for the whole
//! batch, then merges links and results back in before the next round.
//!
//! State machine:
//!
//! ```text
//! Seeding -> Dispatching -> Merging -> (Dispatching ...) -> Draining -> Terminated
//!                 \______________________\___________________________-> Aborted
//! ```

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::callback::PageCallback;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::crawler::pool::{UnitReport, WorkerPool};
use crate::crawler::unit::{CrawlUnit, UnitError};
use crate::config::{validate_crawler_config, validate_seed_url, validate_user_agent_config};
use crate::{ConfigError, ScraperError};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Emits a progress line at info when verbose, otherwise at debug
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

/// Phase of a running crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Seeding,
    Dispatching,
    Merging,
    Draining,
    Terminated,
    Aborted,
}

/// How a crawl ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The frontier was exhausted
    Completed,
    /// The cancellation token fired; the undispatched frontier was abandoned
    Cancelled,
    /// The worker pool faulted; results merged before the fault are kept
    Aborted { reason: String },
}

/// Everything a crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport<T> {
    /// Deduplicated callback results
    pub results: HashSet<T>,
    /// Number of distinct URLs ever enqueued
    pub visited: usize,
    /// Size of each dispatched batch, in order
    pub batch_sizes: Vec<usize>,
    /// Units whose page was fetched and processed
    pub pages_fetched: usize,
    /// Units whose fetch failed (timeout, HTTP error, empty body, ...)
    pub fetch_failures: usize,
    /// Units aborted by a callback error
    pub callback_failures: usize,
    /// Units whose task panicked (fetcher, extractor or callback)
    pub panicked_units: usize,
    /// Units stopped by cancellation
    pub cancelled_units: usize,
    pub outcome: CrawlOutcome,
    pub elapsed: Duration,
}

impl<T> CrawlReport<T> {
    /// Number of dispatch rounds that ran
    pub fn rounds(&self) -> usize {
        self.batch_sizes.len()
    }
}

/// Per-invocation crawl state
struct CrawlSession<T> {
    frontier: Frontier,
    results: HashSet<T>,
    batch_sizes: Vec<usize>,
    pages_fetched: usize,
    fetch_failures: usize,
    callback_failures: usize,
    panicked_units: usize,
    cancelled_units: usize,
    state: CrawlState,
}

impl<T> CrawlSession<T>
where
    T: Eq + Hash + Debug,
{
    fn new(max_pages: Option<usize>) -> Self {
        Self {
            frontier: Frontier::with_limit(max_pages),
            results: HashSet::new(),
            batch_sizes: Vec::new(),
            pages_fetched: 0,
            fetch_failures: 0,
            callback_failures: 0,
            panicked_units: 0,
            cancelled_units: 0,
            state: CrawlState::Seeding,
        }
    }

    fn transition(&mut self, next: CrawlState) {
        tracing::trace!("Crawl state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Folds one batch's reports into the crawl state
    ///
    /// Links are enqueued in batch input order, then extraction order.
    /// Returns the results that were new to the crawl, rendered with `Debug`.
    fn merge(&mut self, reports: Vec<UnitReport<T>>) -> Vec<String> {
        let mut new_results = Vec::new();

        for report in reports {
            match report.outcome {
                Ok(output) => {
                    if output.fetched {
                        self.pages_fetched += 1;
                    } else {
                        self.fetch_failures += 1;
                    }

                    for result in output.results {
                        if !self.results.contains(&result) {
                            new_results.push(format!("{:?}", result));
                            self.results.insert(result);
                        }
                    }

                    for link in output.links {
                        self.frontier.push(link);
                    }
                }
                Err(UnitError::Cancelled { url }) => {
                    tracing::debug!("Unit for {} cancelled before completion", url);
                    self.cancelled_units += 1;
                }
                Err(e @ UnitError::Callback { .. }) => {
                    tracing::error!("Page callback failed, page skipped: {}", e);
                    self.callback_failures += 1;
                }
                Err(e @ UnitError::Panicked { .. }) => {
                    tracing::error!("Crawl unit panicked, page skipped: {}", e);
                    self.panicked_units += 1;
                }
            }
        }

        new_results
    }

    fn into_report(self, outcome: CrawlOutcome, elapsed: Duration) -> CrawlReport<T> {
        CrawlReport {
            results: self.results,
            visited: self.frontier.visited(),
            batch_sizes: self.batch_sizes,
            pages_fetched: self.pages_fetched,
            fetch_failures: self.fetch_failures,
            callback_failures: self.callback_failures,
            panicked_units: self.panicked_units,
            cancelled_units: self.cancelled_units,
            outcome,
            elapsed,
        }
    }
}

/// Main crawler coordinator structure
///
/// A coordinator can run any number of crawls; each call to
/// [`Coordinator::run`] starts from an empty visited set and result set.
pub struct Coordinator<T> {
    config: CrawlerConfig,
    unit: CrawlUnit<T>,
    cancel: CancellationToken,
}

impl<T> Coordinator<T>
where
    T: Eq + Hash + Debug + Send + 'static,
{
    /// Creates a coordinator from explicit collaborators
    ///
    /// The callback is a required argument, so a coordinator can never exist
    /// without one. The crawler config is validated here.
    pub fn new(
        config: CrawlerConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
        callback: Arc<dyn PageCallback<T>>,
    ) -> Result<Self, ScraperError> {
        validate_crawler_config(&config)?;
        let unit = CrawlUnit::new(fetcher, extractor, callback, config.timeout()?);
        Ok(Self {
            config,
            unit,
            cancel: CancellationToken::new(),
        })
    }

    /// Starts a builder with HTTP and HTML defaults
    pub fn builder(config: CrawlerConfig) -> CoordinatorBuilder<T> {
        CoordinatorBuilder::new(config)
    }

    /// Token that stops the crawl when cancelled
    ///
    /// Cancelling it lets the current batch finish or be cut short, then the
    /// crawl returns whatever it has accumulated.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Crawls outward from `seeds` until the frontier is empty
    ///
    /// Only invalid input is an error. Pool faults and cancellation still
    /// return a report, with results merged so far.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ripple_scraper::config::CrawlerConfig;
    /// use ripple_scraper::crawler::Coordinator;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let coordinator = Coordinator::builder(CrawlerConfig::default())
    ///     .callback(|text: &str| -> Vec<String> {
    ///         text.split_whitespace()
    ///             .filter(|w| w.starts_with("ISBN"))
    ///             .map(str::to_string)
    ///             .collect()
    ///     })
    ///     .build()?;
    ///
    /// let report = coordinator.run(&["https://example.com/".to_string()]).await?;
    /// println!("{} results from {} pages", report.results.len(), report.visited);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self, seeds: &[String]) -> Result<CrawlReport<T>, ScraperError> {
        if seeds.is_empty() {
            return Err(
                ConfigError::Validation("at least one seed URL is required".to_string()).into(),
            );
        }
        for seed in seeds {
            validate_seed_url(seed)?;
        }

        let mut pool = WorkerPool::new(
            self.unit.clone(),
            self.config.workers,
            self.cancel.child_token(),
        );
        let report = self.drive(seeds, &mut pool).await;
        pool.terminate();

        Ok(report)
    }

    /// Runs the dispatch/merge loop on an existing pool
    async fn drive(&self, seeds: &[String], pool: &mut WorkerPool<T>) -> CrawlReport<T> {
        let started = Instant::now();
        let verbose = self.config.verbose;
        let mut session = CrawlSession::new(self.config.max_pages);

        let seeded = session.frontier.seed(seeds.iter().cloned());
        tracing::info!(
            "Starting crawl with {} seed URLs ({} workers, {:?} timeout)",
            seeded,
            pool.workers(),
            self.unit.timeout()
        );

        let outcome = loop {
            if self.cancel.is_cancelled() {
                tracing::info!(
                    "Crawl cancelled, abandoning {} queued URLs",
                    session.frontier.queued()
                );
                break CrawlOutcome::Cancelled;
            }

            if session.frontier.is_empty() {
                session.transition(CrawlState::Draining);
                break CrawlOutcome::Completed;
            }

            session.transition(CrawlState::Dispatching);
            progress!(
                verbose,
                "visited: {}, queue: {}",
                session.frontier.visited() - session.frontier.queued(),
                session.frontier.queued()
            );

            let batch = session.frontier.next_batch(pool.workers());
            for url in &batch {
                progress!(verbose, "  {}", url);
            }
            session.batch_sizes.push(batch.len());

            let reports = match pool.run_batch(batch).await {
                Ok(reports) => reports,
                Err(e) => {
                    tracing::error!("Worker pool failed, aborting crawl: {}", e);
                    pool.terminate();
                    break CrawlOutcome::Aborted {
                        reason: e.to_string(),
                    };
                }
            };

            session.transition(CrawlState::Merging);
            let new_results = session.merge(reports);
            progress!(
                verbose,
                "round {}: {} new results ({} total) [{}]",
                session.batch_sizes.len(),
                new_results.len(),
                session.results.len(),
                new_results.join(", ")
            );
        };

        session.transition(match outcome {
            CrawlOutcome::Aborted { .. } => CrawlState::Aborted,
            _ => CrawlState::Terminated,
        });

        let elapsed = started.elapsed();
        tracing::info!(
            "Crawl finished ({:?}): {} results, {} URLs visited, {} rounds in {:?}",
            outcome,
            session.results.len(),
            session.frontier.visited(),
            session.batch_sizes.len(),
            elapsed
        );

        session.into_report(outcome, elapsed)
    }
}

/// Builder for [`Coordinator`]
///
/// Fetcher and link extractor default to [`HttpFetcher`] and
/// [`HtmlLinkExtractor`]. The callback has no default; building without one
/// fails with [`ConfigError::MissingCallback`].
pub struct CoordinatorBuilder<T> {
    config: CrawlerConfig,
    user_agent: UserAgentConfig,
    fetcher: Option<Arc<dyn Fetcher>>,
    extractor: Option<Arc<dyn LinkExtractor>>,
    callback: Option<Arc<dyn PageCallback<T>>>,
    cancel: Option<CancellationToken>,
}

impl<T> CoordinatorBuilder<T>
where
    T: Eq + Hash + Debug + Send + 'static,
{
    pub fn new(config: CrawlerConfig) -> Self {
        Self {
            config,
            user_agent: UserAgentConfig::default(),
            fetcher: None,
            extractor: None,
            callback: None,
            cancel: None,
        }
    }

    /// User agent for the default HTTP fetcher
    pub fn user_agent(mut self, user_agent: UserAgentConfig) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    pub fn extractor(mut self, extractor: impl LinkExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    pub fn callback(mut self, callback: impl PageCallback<T> + 'static) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Shares an externally owned cancellation token
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn build(self) -> Result<Coordinator<T>, ScraperError> {
        let callback = self.callback.ok_or(ConfigError::MissingCallback)?;
        validate_user_agent_config(&self.user_agent)?;

        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new(&self.user_agent)?),
        };
        let extractor = self
            .extractor
            .unwrap_or_else(|| Arc::new(HtmlLinkExtractor));

        let mut coordinator = Coordinator::new(self.config, fetcher, extractor, callback)?;
        if let Some(cancel) = self.cancel {
            coordinator.cancel = cancel;
        }
        Ok(coordinator)
    }
}
