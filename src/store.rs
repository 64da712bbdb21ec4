//! The aggregation store: per-signal rolling flow history and derived averages
//!
//! All signal records live behind a single coarse mutex. Every mutation
//! (insert, append, evict, recompute) is atomic with respect to concurrent
//! ingests and queries, so no caller can observe a record mid-update.
//! Per-signal locking or a sharded map would raise throughput under heavy
//! contention; the coarse lock is a documented trade-off, not a defect.

use crate::types::SignalId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Number of congestion readings retained per signal
pub const FLOW_WINDOW: usize = 10;

/// Most recently reported control parameters for one signal
///
/// Overwritten wholesale on every ingest; the store keeps no configuration
/// history. Values are stored verbatim with no range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalConfig {
    #[serde(alias = "ID")]
    pub id: SignalId,
    #[serde(alias = "Congestion")]
    pub congestion: i64,
    #[serde(alias = "RedLightTime")]
    pub red_light_time: i64,
    #[serde(alias = "YellowLightTime")]
    pub yellow_light_time: i64,
    #[serde(alias = "GreenLightTime")]
    pub green_light_time: i64,
}

/// Per-signal state: latest config, bounded history, derived average
///
/// Created lazily on first ingest, mutated on every subsequent ingest for the
/// same id, never deleted. Exclusively owned by [`SignalStore`]; callers only
/// ever see snapshots.
#[derive(Debug, Clone)]
struct SignalRecord {
    config: SignalConfig,
    flow_history: VecDeque<i64>,
    average_flow_rate: i64,
}

impl SignalRecord {
    fn new(config: SignalConfig) -> Self {
        Self {
            config,
            flow_history: VecDeque::with_capacity(FLOW_WINDOW),
            average_flow_rate: 0,
        }
    }

    /// Append a reading, evict past the window, recompute the average.
    ///
    /// History is never empty after this runs, so the division cannot hit
    /// zero. The average truncates toward zero, matching integer division.
    fn push_reading(&mut self, congestion: i64) {
        self.flow_history.push_back(congestion);
        while self.flow_history.len() > FLOW_WINDOW {
            self.flow_history.pop_front();
        }
        let total: i64 = self.flow_history.iter().sum();
        self.average_flow_rate = total / self.flow_history.len() as i64;
    }
}

/// Read-only projection of a [`SignalRecord`] handed out by queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRecordSnapshot {
    #[serde(rename = "trafficSignal")]
    pub traffic_signal: SignalConfig,
    #[serde(rename = "flowData")]
    pub flow_data: Vec<i64>,
    #[serde(rename = "averageFlowRate")]
    pub average_flow_rate: i64,
}

/// Thread-safe store mapping signal identity to its record
///
/// Cheap to clone; all clones share the same map. Constructed explicitly at
/// process start and passed by handle to request handlers, so tests can build
/// isolated instances.
#[derive(Debug, Clone, Default)]
pub struct SignalStore {
    signals: Arc<Mutex<HashMap<SignalId, SignalRecord>>>,
}

impl SignalStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one reading for a signal
    ///
    /// Inside one critical section: upserts the record, replaces its
    /// configuration with `config` (full overwrite, not a merge), appends the
    /// congestion reading, evicts past [`FLOW_WINDOW`], and recomputes the
    /// average. Throughput accounting is the caller's concern; the store does
    /// not touch the metrics counters.
    pub fn ingest(&self, config: SignalConfig) {
        let mut signals = self.signals.lock().unwrap_or_else(|e| e.into_inner());
        let record = signals
            .entry(config.id)
            .or_insert_with(|| SignalRecord::new(config));
        record.config = config;
        record.push_reading(config.congestion);
        debug!(
            id = config.id.get(),
            congestion = config.congestion,
            average = record.average_flow_rate,
            history_len = record.flow_history.len(),
            "ingested reading"
        );
    }

    /// Current average flow rate for a signal, or `None` if never ingested
    #[must_use]
    pub fn average_flow_rate(&self, id: SignalId) -> Option<i64> {
        let signals = self.signals.lock().unwrap_or_else(|e| e.into_inner());
        signals.get(&id).map(|r| r.average_flow_rate)
    }

    /// Latest configuration for a signal, or `None` if never ingested
    #[must_use]
    pub fn configuration(&self, id: SignalId) -> Option<SignalConfig> {
        let signals = self.signals.lock().unwrap_or_else(|e| e.into_inner());
        signals.get(&id).map(|r| r.config)
    }

    /// Full snapshot (config + history + average) for a signal
    #[must_use]
    pub fn record(&self, id: SignalId) -> Option<SignalRecordSnapshot> {
        let signals = self.signals.lock().unwrap_or_else(|e| e.into_inner());
        signals.get(&id).map(|r| SignalRecordSnapshot {
            traffic_signal: r.config,
            flow_data: r.flow_history.iter().copied().collect(),
            average_flow_rate: r.average_flow_rate,
        })
    }

    /// Number of distinct signals seen so far
    #[must_use]
    pub fn signal_count(&self) -> usize {
        let signals = self.signals.lock().unwrap_or_else(|e| e.into_inner());
        signals.len()
    }
}
