//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use listing_aggregation::AggregationStore;
use listing_api::state::AppState;
use listing_core::config::AggregationConfig;
use listing_kv::JsonFileStore;
use listing_test_support::{FixedClock, SequenceRng};
use tempfile::TempDir;
use tower::ServiceExt;

/// A test app over a file store in its own temporary directory.
pub struct TestApp {
    /// Keeps the store directory alive for the test's duration.
    pub dir: TempDir,
    /// Shared state; clone it into each router built by `router()`.
    pub state: AppState,
}

impl TestApp {
    /// A fresh router over the shared state.
    pub fn router(&self) -> Router {
        listing_api::app(self.state.clone())
    }
}

/// Build the app with a real `JsonFileStore`, a fixed clock and a
/// deterministic id suffix.
pub fn build_test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let kv = Arc::new(JsonFileStore::new(dir.path().join("store.json")));
    let clock = Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ));
    let rng = SequenceRng::new((0..36).collect());
    let store = AggregationStore::new(AggregationConfig::default(), clock, Box::new(rng), kv);
    TestApp {
        dir,
        state: AppState::new(store),
    }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with no body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// A `NEW_LISTING` message body.
pub fn new_listing(title: &str, price: f64) -> serde_json::Value {
    serde_json::json!({
        "type": "NEW_LISTING",
        "data": {
            "title": title,
            "description": "Barely worn",
            "price": price,
            "images": ["blob:https://www.depop.com/1"],
            "condition": "Used - Good",
            "size": "M",
            "category": "Jackets"
        }
    })
}
