//! Crawl frontier: visited set and FIFO queue
//!
//! Every URL that is ever enqueued is recorded in the visited set at the same
//! moment, so the queue is always a subset of the visited set and no URL is
//! enqueued twice. URLs are compared as exact strings.

use std::collections::{HashSet, VecDeque};

/// Visited set plus the queue of URLs awaiting dispatch
#[derive(Debug, Default)]
pub struct Frontier {
    /// Every URL ever enqueued; never shrinks
    visited: HashSet<String>,

    /// URLs waiting to be dispatched, oldest first
    queue: VecDeque<String>,

    /// Once `visited` reaches this size no further URLs are accepted
    max_visited: Option<usize>,
}

impl Frontier {
    /// Creates an empty, unbounded frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier that stops accepting URLs after `limit` visits
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            max_visited: limit,
            ..Self::default()
        }
    }

    /// Inserts seed URLs, skipping any already visited
    ///
    /// Seeds are always accepted; the visit limit applies only to links
    /// discovered later. Returns how many URLs were actually enqueued.
    pub fn seed<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for url in urls {
            if self.insert(url.into()) {
                added += 1;
            }
        }
        added
    }

    /// Enqueues a URL unless it has been seen before or the limit is reached
    ///
    /// Returns `true` if the URL was enqueued.
    pub fn push(&mut self, url: String) -> bool {
        if self.is_full() {
            return false;
        }
        self.insert(url)
    }

    fn insert(&mut self, url: String) -> bool {
        if self.visited.contains(&url) {
            return false;
        }

        self.visited.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Removes up to `size` URLs from the front of the queue
    pub fn next_batch(&mut self, size: usize) -> Vec<String> {
        let take = size.min(self.queue.len());
        self.queue.drain(..take).collect()
    }

    /// Returns true if nothing is waiting to be dispatched
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs waiting to be dispatched
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Number of distinct URLs ever enqueued
    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if the URL has ever been enqueued
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Returns true once the visit limit has been reached
    pub fn is_full(&self) -> bool {
        self.max_visited
            .map_or(false, |limit| self.visited.len() >= limit)
    }

    /// Iterates over the queued URLs in dispatch order
    pub fn iter_queued(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }
}
