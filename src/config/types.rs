use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// Default number of concurrent crawl workers
pub const DEFAULT_WORKERS: usize = 20;

/// Default per-fetch timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT: f64 = 5.0;

/// Main configuration structure for Ripple-Scraper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub seeds: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of pages fetched concurrently in one batch
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Per-fetch timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: f64,

    /// Emit progress lines at info level
    #[serde(default = "default_verbose")]
    pub verbose: bool,

    /// Stop enqueueing new links once this many URLs have been visited
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<usize>,
}

impl CrawlerConfig {
    /// Returns the per-fetch timeout as a Duration
    ///
    /// Fails unless `request_timeout` is a positive number of seconds that
    /// a `Duration` can hold.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        match Duration::try_from_secs_f64(self.request_timeout) {
            Ok(timeout) if !timeout.is_zero() => Ok(timeout),
            _ => Err(ConfigError::Validation(format!(
                "request_timeout must be a positive number of seconds, got {}",
                self.request_timeout
            ))),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            verbose: true,
            max_pages: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// File the final result set is written to, one value per line
    #[serde(rename = "results-path", default)]
    pub results_path: Option<String>,
}

/// Which built-in page callback the binary runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractKind {
    /// Valid Bitcoin addresses found in page text
    #[default]
    Bitcoin,
    /// Every match of a user-supplied regular expression
    Pattern,
}

/// Page extraction configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractConfig {
    #[serde(default)]
    pub kind: ExtractKind,

    /// Regular expression used when `kind = "pattern"`
    #[serde(default)]
    pub pattern: Option<String>,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_request_timeout() -> f64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_verbose() -> bool {
    true
}

fn default_crawler_name() -> String {
    "RippleScraper".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
