//! Background rate sampler
//!
//! A single long-lived task that wakes on a fixed interval, takes the delta
//! of the total-ingest counter since its last wakeup, and publishes it as the
//! current requests-per-second value. It reads and writes only the atomic
//! counters; it never touches the signal store's mutex, so sampling cannot
//! stall ingest and ingest cannot stall sampling.

use crate::metrics::ThroughputMetrics;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Handle to the running sampler task
///
/// The sampler has exactly two states: running from the moment it is
/// spawned, stopped once shutdown is signalled. Dropping the handle also
/// stops the task (the watch sender goes away); [`RateSampler::shutdown`]
/// additionally waits for the task to exit.
pub struct RateSampler {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RateSampler {
    /// Spawn the sampling loop on the current tokio runtime
    ///
    /// The first published rate is computed against an initial previous total
    /// of 0, so it equals the number of ingests since process start.
    pub fn spawn(metrics: ThroughputMetrics, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick of tokio's interval fires immediately; skip it
            // so every published rate covers one full interval.
            ticker.tick().await;

            let mut previous_total: u64 = 0;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let total = metrics.total_requests();
                        let rate = total - previous_total;
                        previous_total = total;
                        metrics.publish_rate(rate);
                        debug!(requests_per_second = rate, "sampled ingest rate");
                    }
                    _ = shutdown_rx.changed() => {
                        info!("rate sampler shutting down");
                        break;
                    }
                }
            }
        });
        Self { shutdown_tx, task }
    }

    /// Signal the sampler to stop and wait for the task to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(50);

    /// Sleep long enough to be safely past an interval boundary
    async fn next_interval() {
        tokio::time::sleep(TICK + Duration::from_millis(25)).await;
    }

    #[tokio::test]
    async fn test_first_sample_counts_from_zero() {
        let metrics = ThroughputMetrics::new();
        for _ in 0..4 {
            metrics.record_ingest();
        }
        let sampler = RateSampler::spawn(metrics.clone(), TICK);

        next_interval().await;
        assert_eq!(metrics.requests_per_second(), 4);
        sampler.shutdown().await;
    }

    #[tokio::test]
    async fn test_rate_drops_to_zero_after_quiet_interval() {
        let metrics = ThroughputMetrics::new();
        metrics.record_ingest();
        metrics.record_ingest();
        let sampler = RateSampler::spawn(metrics.clone(), TICK);

        next_interval().await;
        assert_eq!(metrics.requests_per_second(), 2);

        // No ingests in the next interval; rate is replaced, not accumulated
        next_interval().await;
        assert_eq!(metrics.requests_per_second(), 0);
        // Total is monotonic and untouched by sampling
        assert_eq!(metrics.total_requests(), 2);
        sampler.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_publishing() {
        let metrics = ThroughputMetrics::new();
        let sampler = RateSampler::spawn(metrics.clone(), TICK);
        sampler.shutdown().await;

        metrics.record_ingest();
        next_interval().await;
        next_interval().await;
        // Sampler is gone; nothing publishes a new rate
        assert_eq!(metrics.requests_per_second(), 0);
        assert_eq!(metrics.total_requests(), 1);
    }
}
