//! HTTP transport for the aggregator
//!
//! A thin axum layer over the core: it decodes request payloads, maps textual
//! id parameters to [`SignalId`], and encodes responses with the wire field
//! names (`averageFlowRate`, `trafficSignal`, `totalRequests`,
//! `requestsPerSecond`). All aggregation semantics live in the store and
//! metrics modules; handlers only translate.

use crate::error::AggregatorError;
use crate::metrics::ThroughputMetrics;
use crate::store::{SignalConfig, SignalStore};
use crate::types::SignalId;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Shared handles passed to every request handler
///
/// Constructed once at startup; cheap to clone (both members are handles to
/// shared state). Tests build fresh instances for isolation.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub store: SignalStore,
    pub metrics: ThroughputMetrics,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Query parameters for the per-signal endpoints
#[derive(Debug, Deserialize)]
struct SignalQuery {
    id: Option<String>,
}

impl SignalQuery {
    /// Resolve the textual id parameter to a signal key
    fn signal_id(&self) -> Result<SignalId, AggregatorError> {
        let raw = self
            .id
            .as_deref()
            .ok_or_else(|| AggregatorError::InvalidInput("missing traffic signal ID".into()))?;
        raw.parse().map_err(|_| {
            AggregatorError::InvalidInput(format!("invalid traffic signal ID: {raw}"))
        })
    }
}

#[derive(Debug, Serialize)]
struct AverageResponse {
    #[serde(rename = "averageFlowRate")]
    average_flow_rate: i64,
}

/// Serialize a value into a JSON response body
fn json_response<T: Serialize>(value: &T) -> Result<Response, AggregatorError> {
    let body = serde_json::to_string(value)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

/// POST /traffic — ingest one congestion reading
async fn ingest(
    State(state): State<AppState>,
    payload: Result<Json<SignalConfig>, JsonRejection>,
) -> Result<Response, AggregatorError> {
    let Json(signal) = payload
        .map_err(|e| AggregatorError::InvalidInput(format!("invalid request payload: {e}")))?;

    state.metrics.record_ingest();
    state.store.ingest(signal);

    info!(
        id = signal.id.get(),
        congestion = signal.congestion,
        red = signal.red_light_time,
        yellow = signal.yellow_light_time,
        green = signal.green_light_time,
        "traffic signal reading stored"
    );

    Ok((StatusCode::OK, "Traffic signal data stored successfully").into_response())
}

/// GET /traffic/info?id=N — current average flow rate for one signal
async fn signal_info(
    State(state): State<AppState>,
    Query(query): Query<SignalQuery>,
) -> Result<Response, AggregatorError> {
    let id = query.signal_id()?;
    let average_flow_rate = state
        .store
        .average_flow_rate(id)
        .ok_or(AggregatorError::NotFound(id))?;
    json_response(&AverageResponse { average_flow_rate })
}

/// GET /trafficflow?id=N — full record: config, history, average
async fn signal_flow(
    State(state): State<AppState>,
    Query(query): Query<SignalQuery>,
) -> Result<Response, AggregatorError> {
    let id = query.signal_id()?;
    let record = state.store.record(id).ok_or(AggregatorError::NotFound(id))?;
    json_response(&record)
}

/// GET /stats — process-wide throughput counters
///
/// Reads only the atomic counters; never blocks on the store.
async fn stats(State(state): State<AppState>) -> Result<Response, AggregatorError> {
    json_response(&state.metrics.snapshot())
}

/// Build the service router
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/traffic", post(ingest))
        .route("/traffic/info", get(signal_info))
        .route("/trafficflow", get(signal_flow))
        .route("/stats", get(stats))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_query_missing_id() {
        let query = SignalQuery { id: None };
        assert!(matches!(
            query.signal_id(),
            Err(AggregatorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_signal_query_non_numeric_id() {
        let query = SignalQuery {
            id: Some("abc".into()),
        };
        assert!(matches!(
            query.signal_id(),
            Err(AggregatorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_signal_query_numeric_id() {
        let query = SignalQuery {
            id: Some("17".into()),
        };
        assert_eq!(query.signal_id().unwrap(), SignalId::new(17));
    }
}
