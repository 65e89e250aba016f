//! Fixed-size worker pool for crawl units
//!
//! The pool runs one batch at a time. Every URL of a batch is spawned as its
//! own tokio task, but a semaphore with `workers` permits bounds how many of
//! them do work at once. Tasks never look at process signals; they only
//! watch the pool's cancellation token, which the coordinator derives from
//! its own.

use crate::crawler::unit::{CrawlUnit, UnitError, UnitOutput};
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

/// Faults that leave the pool unable to run work
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("worker pool is closed and cannot schedule work")]
    Closed,

    #[error("worker task failed: {0}")]
    Worker(String),
}

/// Result of one unit, paired with the URL it ran on
#[derive(Debug)]
pub struct UnitReport<T> {
    pub url: String,
    pub outcome: Result<UnitOutput<T>, UnitError>,
}

/// Bounded-parallelism executor for crawl units
pub struct WorkerPool<T> {
    unit: CrawlUnit<T>,
    workers: usize,
    slots: Arc<Semaphore>,
    cancel: CancellationToken,
    in_flight: Vec<AbortHandle>,
}

impl<T> WorkerPool<T>
where
    T: Send + 'static,
{
    /// Creates a pool with `workers` slots (at least one)
    pub fn new(unit: CrawlUnit<T>, workers: usize, cancel: CancellationToken) -> Self {
        let workers = workers.max(1);
        Self {
            unit,
            workers,
            slots: Arc::new(Semaphore::new(workers)),
            cancel,
            in_flight: Vec::new(),
        }
    }

    /// Number of units allowed to run concurrently
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns true once the pool has been terminated
    pub fn is_terminated(&self) -> bool {
        self.slots.is_closed()
    }

    /// Runs every URL of the batch and waits for all of them
    ///
    /// Reports come back in the same order as `urls`. Failures of individual
    /// units, including panics, are reported per URL. If the pool itself
    /// can no longer schedule work it is terminated and an error returned.
    pub async fn run_batch(&mut self, urls: Vec<String>) -> Result<Vec<UnitReport<T>>, PoolError> {
        if self.is_terminated() {
            return Err(PoolError::Closed);
        }

        let mut handles = Vec::with_capacity(urls.len());
        for url in &urls {
            let unit = self.unit.clone();
            let slots = Arc::clone(&self.slots);
            let cancel = self.cancel.clone();
            let url = url.clone();

            let handle = tokio::spawn(async move {
                let work = async {
                    let _permit = slots.acquire_owned().await.map_err(|_| PoolError::Closed)?;
                    Ok::<_, PoolError>(unit.run(&url).await)
                };

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Ok(Err(UnitError::Cancelled { url: url.clone() })),
                    outcome = work => outcome,
                }
            });

            self.in_flight.push(handle.abort_handle());
            handles.push(handle);
        }

        let mut reports = Vec::with_capacity(urls.len());
        for (url, handle) in urls.into_iter().zip(handles) {
            let outcome = match handle.await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(fault)) => {
                    tracing::error!("Worker pool fault while running {}: {}", url, fault);
                    self.terminate();
                    return Err(fault);
                }
                Err(e) if e.is_panic() => Err(UnitError::Panicked {
                    url: url.clone(),
                    message: panic_message(e.into_panic()),
                }),
                Err(_) if self.cancel.is_cancelled() => {
                    Err(UnitError::Cancelled { url: url.clone() })
                }
                Err(e) => {
                    tracing::error!("Worker task for {} was lost: {}", url, e);
                    self.terminate();
                    return Err(PoolError::Worker(e.to_string()));
                }
            };
            reports.push(UnitReport { url, outcome });
        }

        self.in_flight.clear();
        Ok(reports)
    }

    /// Forcibly stops all in-flight and queued units
    ///
    /// Idempotent. After this the pool refuses new batches.
    pub fn terminate(&mut self) {
        if !self.is_terminated() {
            tracing::debug!("Terminating worker pool ({} tasks in flight)", self.in_flight.len());
        }
        self.cancel.cancel();
        self.slots.close();
        for handle in self.in_flight.drain(..) {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn slots(&self) -> Arc<Semaphore> {
        Arc::clone(&self.slots)
    }
}

impl<T> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.slots.close();
        for handle in self.in_flight.drain(..) {
            handle.abort();
        }
    }
}

/// Best-effort text of a panic payload
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
