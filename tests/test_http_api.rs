//! End-to-end tests for the HTTP API
//!
//! Drives the axum router directly with `tower::ServiceExt::oneshot`, no
//! listener required.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use traffic_aggregator::{AppState, router};

fn app() -> (Router, AppState) {
    let state = AppState::new();
    (router(state.clone()), state)
}

async fn post_traffic(app: &Router, payload: Value) -> StatusCode {
    let request = Request::builder()
        .method("POST")
        .uri("/traffic")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Option<Value>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).ok())
}

fn reading(id: i64, congestion: i64) -> Value {
    json!({
        "id": id,
        "congestion": congestion,
        "redLightTime": 30,
        "yellowLightTime": 5,
        "greenLightTime": 25,
    })
}

#[tokio::test]
async fn test_ingest_then_query_average() {
    let (app, _) = app();

    assert_eq!(post_traffic(&app, reading(1, 50)).await, StatusCode::OK);
    assert_eq!(post_traffic(&app, reading(1, 70)).await, StatusCode::OK);

    let (status, body) = get_json(&app, "/traffic/info?id=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["averageFlowRate"], 60);
}

#[tokio::test]
async fn test_query_unknown_signal_is_404() {
    let (app, _) = app();
    post_traffic(&app, reading(1, 50)).await;

    let (status, _) = get_json(&app, "/traffic/info?id=2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(&app, "/trafficflow?id=2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_or_bad_id_is_400() {
    let (app, _) = app();

    let (status, _) = get_json(&app, "/traffic/info").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(&app, "/traffic/info?id=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(&app, "/trafficflow?id=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_ingest_payload_is_400() {
    let (app, _) = app();

    let request = Request::builder()
        .method("POST")
        .uri("/traffic")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Structurally valid JSON missing required fields is also rejected
    assert_eq!(
        post_traffic(&app, json!({"congestion": 50})).await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_get_on_ingest_route_is_rejected() {
    let (app, _) = app();
    let (status, _) = get_json(&app, "/traffic").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_window_eviction_over_http() {
    let (app, _) = app();

    for congestion in (10..=100).step_by(10) {
        post_traffic(&app, reading(3, congestion)).await;
    }
    post_traffic(&app, reading(3, 5)).await;

    let (status, body) = get_json(&app, "/trafficflow?id=3").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["flowData"], json!([20, 30, 40, 50, 60, 70, 80, 90, 100, 5]));
    // floor(545 / 10)
    assert_eq!(body["averageFlowRate"], 54);
    assert_eq!(body["trafficSignal"]["congestion"], 5);
}

#[tokio::test]
async fn test_go_style_field_names_accepted() {
    let (app, _) = app();

    let payload = json!({
        "ID": 9,
        "Congestion": 40,
        "RedLightTime": 30,
        "YellowLightTime": 5,
        "GreenLightTime": 25,
    });
    assert_eq!(post_traffic(&app, payload).await, StatusCode::OK);

    let (status, body) = get_json(&app, "/traffic/info?id=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["averageFlowRate"], 40);
}

#[tokio::test]
async fn test_stats_counts_ingests() {
    let (app, state) = app();

    for i in 0..3 {
        post_traffic(&app, reading(i, 10)).await;
    }

    let (status, body) = get_json(&app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["totalRequests"], 3);
    // No sampler running in this test; the published rate stays at zero
    assert_eq!(body["requestsPerSecond"], 0);
    assert_eq!(state.metrics.total_requests(), 3);
}

#[tokio::test]
async fn test_rejected_ingest_not_counted() {
    // Only successful ingests reach the throughput counter; a payload that
    // fails to decode never touches it.
    let (app, state) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/traffic")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let _ = app.clone().oneshot(request).await.unwrap();
    assert_eq!(state.metrics.total_requests(), 0);
}
