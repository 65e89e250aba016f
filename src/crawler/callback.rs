//! Page callback capability
//!
//! A [`PageCallback`] turns the decoded text of one page into zero or more
//! domain values. Every crawled page is passed through exactly one callback.

/// Extracts domain values from a page's text
///
/// Errors are treated as a misconfiguration of the crawl, not as a network
/// condition: the unit that hit them contributes nothing and the failure is
/// logged at error level.
pub trait PageCallback<T>: Send + Sync {
    fn process(&self, text: &str) -> anyhow::Result<Vec<T>>;
}

impl<F, T> PageCallback<T> for F
where
    F: Fn(&str) -> Vec<T> + Send + Sync,
{
    fn process(&self, text: &str) -> anyhow::Result<Vec<T>> {
        Ok(self(text))
    }
}
