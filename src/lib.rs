//! In-memory traffic signal telemetry aggregator
//!
//! Clients push periodic congestion readings per signal; the aggregator keeps
//! a bounded rolling history for each signal, derives an integer moving
//! average, and separately tracks global request throughput sampled once per
//! interval by a background task.
//!
//! Core pieces:
//! - [`store::SignalStore`] — the signal map behind one coarse mutex
//! - [`metrics::ThroughputMetrics`] — lock-free ingest counters
//! - [`sampler::RateSampler`] — the background requests-per-second sampler
//! - [`server`] — the thin HTTP layer over the core

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod sampler;
pub mod server;
pub mod store;
pub mod types;

pub use config::{Config, ConfigSource, load_config, load_config_with_fallback};
pub use error::AggregatorError;
pub use metrics::{StatsSnapshot, ThroughputMetrics};
pub use sampler::RateSampler;
pub use server::{AppState, router};
pub use store::{FLOW_WINDOW, SignalConfig, SignalRecordSnapshot, SignalStore};
pub use types::{Port, SignalId};
