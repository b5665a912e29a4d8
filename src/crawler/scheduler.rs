//! Admission control for page and image fetches
//!
//! This module handles:
//! - The global ceiling on fetches in flight, via a semaphore
//! - FIFO admission, so no waiting fetch starves
//! - In-flight and peak counters for the crawl report
//!
//! A permit covers one fetch only. Pages release it before waiting on their
//! children, otherwise a deep tree could hold every permit while blocked.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Permission to run one fetch; releases its slot when dropped
pub struct FetchPermit {
    counters: Arc<Counters>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for FetchPermit {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
struct Counters {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// Scheduler bounding the number of concurrent fetches
///
/// Cloning is cheap; clones share the same ceiling and counters.
#[derive(Debug, Clone)]
pub struct Scheduler {
    semaphore: Arc<Semaphore>,
    counters: Arc<Counters>,
    limit: usize,
}

impl Scheduler {
    /// Creates a scheduler admitting at most `limit` fetches at once
    ///
    /// A limit of zero is raised to one.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            counters: Arc::new(Counters::default()),
            limit,
        }
    }

    /// Waits for a free slot
    ///
    /// Waiters are admitted in arrival order.
    pub async fn acquire(&self) -> FetchPermit {
        // The semaphore is private to the scheduler and never closed.
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("fetch semaphore is never closed");

        let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak.fetch_max(now, Ordering::SeqCst);
        tracing::trace!("Fetch admitted ({}/{})", now, self.limit);

        FetchPermit {
            counters: Arc::clone(&self.counters),
            _permit: permit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Fetches currently holding a permit
    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous fetches observed so far
    pub fn peak(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }

    /// Free slots right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
