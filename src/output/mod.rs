//! Output module for crawl results and statistics
//!
//! This module handles:
//! - Summarizing a crawl report into printable statistics
//! - Writing the final result set to a file

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};

use std::collections::HashSet;
use std::fmt::Display;
use std::io::Write;
use std::path::Path;

/// Returns the results as sorted display strings
pub fn sorted_results<T: Display>(results: &HashSet<T>) -> Vec<String> {
    let mut lines: Vec<String> = results.iter().map(|r| r.to_string()).collect();
    lines.sort();
    lines
}

/// Writes one result per line, sorted, replacing any existing file
///
/// # Arguments
///
/// * `path` - Destination file
/// * `results` - The crawl's result set
///
/// # Returns
///
/// * `Ok(usize)` - Number of lines written
/// * `Err(std::io::Error)` - Failed to create or write the file
pub fn write_results<T: Display>(path: &Path, results: &HashSet<T>) -> std::io::Result<usize> {
    let lines = sorted_results(results);

    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    for line in &lines {
        writeln!(file, "{}", line)?;
    }
    file.flush()?;

    Ok(lines.len())
}
