//! Error taxonomy for the aggregator
//!
//! Three cases cover every failure the service can surface: a malformed
//! request, a query for a signal never ingested, and a response that cannot
//! be serialized. Nothing is retried internally; every error is reported
//! synchronously to the caller.

use crate::types::SignalId;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors surfaced to API callers
#[derive(Debug, Error)]
pub enum AggregatorError {
    /// Malformed or missing identity/payload
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Query for a signal that has never been ingested
    #[error("traffic signal {0} not found")]
    NotFound(SignalId),

    /// The response payload could not be serialized
    #[error("failed to encode response: {0}")]
    EncodingFailure(#[from] serde_json::Error),
}

impl IntoResponse for AggregatorError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::EncodingFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
