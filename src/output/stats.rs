//! Statistics derived from a finished crawl

use crate::crawler::{CrawlOutcome, CrawlReport};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Number of distinct results
    pub distinct_results: usize,

    /// Number of distinct URLs visited
    pub visited: usize,

    /// Number of dispatch rounds
    pub rounds: usize,

    /// Pages fetched and processed
    pub pages_fetched: usize,

    /// Pages whose fetch failed
    pub fetch_failures: usize,

    /// Pages skipped because the callback failed
    pub callback_failures: usize,

    /// Pages skipped because their unit panicked
    pub panicked_units: usize,

    /// Units stopped by cancellation
    pub cancelled_units: usize,

    pub outcome: CrawlOutcome,
    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn from_report<T>(report: &CrawlReport<T>) -> Self {
        Self {
            distinct_results: report.results.len(),
            visited: report.visited,
            rounds: report.rounds(),
            pages_fetched: report.pages_fetched,
            fetch_failures: report.fetch_failures,
            callback_failures: report.callback_failures,
            panicked_units: report.panicked_units,
            cancelled_units: report.cancelled_units,
            outcome: report.outcome.clone(),
            elapsed: report.elapsed,
        }
    }

    /// Share of dispatched pages that were fetched successfully, in percent
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_fetched
            + self.fetch_failures
            + self.callback_failures
            + self.panicked_units;
        if attempted > 0 {
            (self.pages_fetched as f64 / attempted as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    let outcome = match &stats.outcome {
        CrawlOutcome::Completed => "completed".to_string(),
        CrawlOutcome::Cancelled => "cancelled".to_string(),
        CrawlOutcome::Aborted { reason } => format!("aborted ({})", reason),
    };
    println!("Outcome: {}", outcome);
    println!("Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    println!("Overview:");
    println!("  Distinct results: {}", stats.distinct_results);
    println!("  URLs visited: {}", stats.visited);
    println!("  Rounds: {}", stats.rounds);
    println!();

    println!("Pages:");
    println!("  Fetched: {}", stats.pages_fetched);
    println!("  Fetch failures: {}", stats.fetch_failures);
    if stats.callback_failures > 0 {
        println!("  Callback failures: {}", stats.callback_failures);
    }
    if stats.panicked_units > 0 {
        println!("  Panicked: {}", stats.panicked_units);
    }
    if stats.cancelled_units > 0 {
        println!("  Cancelled: {}", stats.cancelled_units);
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} pages successfully processed)",
        stats.success_rate(),
        stats.pages_fetched
    );
}
