//! Request counters for the recognition service.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters held by one service instance.
#[derive(Debug, Default)]
pub struct ServiceStats {
    requests_received: AtomicU64,
    cache_hits: AtomicU64,
    recognitions_started: AtomicU64,
    recognitions_completed: AtomicU64,
    recognitions_failed: AtomicU64,
    in_flight: AtomicUsize,
}

/// A point-in-time copy of [`ServiceStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Every call to the service, cache hits included.
    pub requests_received: u64,
    pub cache_hits: u64,
    pub recognitions_started: u64,
    /// Recognitions whose blocks were produced and handed to the store.
    pub recognitions_completed: u64,
    pub recognitions_failed: u64,
    pub in_flight: usize,
}

impl ServiceStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_request(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_completion(&self) {
        self.recognitions_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.recognitions_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Marks a recognition as running until the guard is dropped.
    pub(crate) fn start_recognition(&self) -> InFlightGuard<'_> {
        self.recognitions_started.fetch_add(1, Ordering::Relaxed);
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InFlightGuard { stats: self }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            recognitions_started: self.recognitions_started.load(Ordering::Relaxed),
            recognitions_completed: self.recognitions_completed.load(Ordering::Relaxed),
            recognitions_failed: self.recognitions_failed.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::Relaxed),
        }
    }
}

pub(crate) struct InFlightGuard<'a> {
    stats: &'a ServiceStats,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.stats.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_guard_decrements() {
        let stats = ServiceStats::new();
        stats.record_request();
        {
            let _guard = stats.start_recognition();
            assert_eq!(stats.snapshot().in_flight, 1);
        }
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.in_flight, 0);
        assert_eq!(snapshot.recognitions_started, 1);
        assert_eq!(snapshot.recognitions_completed, 0);
        assert_eq!(snapshot.requests_received, 1);
    }
}
