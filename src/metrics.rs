//! Process-wide throughput counters
//!
//! Lock-free tracking of ingest throughput using atomic operations. Updates
//! happen on the hot path of every ingest and must never contend with the
//! signal store's mutex; reads never block either, so stats queries cannot be
//! delayed by store contention and vice versa.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Thread-safe throughput counter handle
///
/// Cheap to clone; all clones share the same counters. Safe to update from
/// any thread.
#[derive(Debug, Clone)]
pub struct ThroughputMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Total successful ingests since process start, never reset
    total_requests: AtomicU64,
    /// Ingests observed during the last completed sampling interval.
    /// Replaced, not accumulated, by the rate sampler.
    requests_per_second: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl ThroughputMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                total_requests: AtomicU64::new(0),
                requests_per_second: AtomicU64::new(0),
                start_time: Instant::now(),
            }),
        }
    }

    /// Record one successful ingest (atomic, lock-free)
    #[inline]
    pub fn record_ingest(&self) {
        self.inner.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Current total ingest count
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.inner.total_requests.load(Ordering::Relaxed)
    }

    /// Publish a freshly sampled rate, replacing the previous value
    ///
    /// Called once per interval by the rate sampler; nothing else writes this
    /// counter.
    pub fn publish_rate(&self, rate: u64) {
        self.inner.requests_per_second.store(rate, Ordering::Relaxed);
    }

    /// Rate published by the most recent sampling interval
    ///
    /// May be up to one interval stale; that staleness is intentional.
    #[must_use]
    pub fn requests_per_second(&self) -> u64 {
        self.inner.requests_per_second.load(Ordering::Relaxed)
    }

    /// Take a point-in-time snapshot of both counters
    ///
    /// Pure atomic loads; never takes any lock.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_requests: self.total_requests(),
            requests_per_second: self.requests_per_second(),
        }
    }

    /// Uptime since the counters were created
    #[must_use]
    pub fn uptime(&self) -> std::time::Duration {
        self.inner.start_time.elapsed()
    }
}

impl Default for ThroughputMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of current throughput counters (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(rename = "totalRequests")]
    pub total_requests: u64,
    #[serde(rename = "requestsPerSecond")]
    pub requests_per_second: u64,
}
