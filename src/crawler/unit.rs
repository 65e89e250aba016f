//! Per-URL unit of work
//!
//! A crawl unit fetches one page, hands its text to the page callback and
//! collects the page's outbound links. It never touches the frontier; the
//! coordinator merges its output.

use crate::crawler::callback::PageCallback;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::LinkExtractor;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// What one page contributed to the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOutput<T> {
    /// Outbound links, in extraction order
    pub links: Vec<String>,
    /// Values returned by the page callback
    pub results: Vec<T>,
    /// Whether the page was actually fetched
    pub fetched: bool,
}

impl<T> UnitOutput<T> {
    /// Output of a unit whose fetch failed
    pub fn empty() -> Self {
        Self {
            links: Vec::new(),
            results: Vec::new(),
            fetched: false,
        }
    }
}

/// Failures that are not ordinary network conditions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("page callback failed for {url}: {message}")]
    Callback { url: String, message: String },

    #[error("crawl unit for {url} panicked: {message}")]
    Panicked { url: String, message: String },

    #[error("crawl unit for {url} was cancelled")]
    Cancelled { url: String },
}

/// Fetch, callback and link extraction for a single URL
pub struct CrawlUnit<T> {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    callback: Arc<dyn PageCallback<T>>,
    timeout: Duration,
}

impl<T> Clone for CrawlUnit<T> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            extractor: Arc::clone(&self.extractor),
            callback: Arc::clone(&self.callback),
            timeout: self.timeout,
        }
    }
}

impl<T> CrawlUnit<T> {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
        callback: Arc<dyn PageCallback<T>>,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            callback,
            timeout,
        }
    }

    /// Per-fetch timeout applied by this unit
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Processes one URL
    ///
    /// A failed or empty fetch yields an empty output, not an error. A
    /// callback error aborts the unit and is returned so the caller can tell
    /// it apart from network trouble.
    pub async fn run(&self, url: &str) -> Result<UnitOutput<T>, UnitError> {
        let page = match self.fetcher.fetch(url, self.timeout).await {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!("Fetch failed for {}: {}", url, e);
                return Ok(UnitOutput::empty());
            }
        };

        if page.final_url != url {
            tracing::trace!("{} redirected to {}", url, page.final_url);
        }

        let text = String::from_utf8_lossy(&page.body);
        let results = self
            .callback
            .process(&text)
            .map_err(|e| UnitError::Callback {
                url: url.to_string(),
                message: format!("{:#}", e),
            })?;

        let links = self.extractor.extract_links(&page.body);

        Ok(UnitOutput {
            links,
            results,
            fetched: true,
        })
    }
}
