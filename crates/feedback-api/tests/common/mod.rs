//! Shared helpers for API integration tests

#![allow(dead_code, clippy::missing_panics_doc)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::{DateTime, TimeZone, Utc};
use feedback_core::{Config, Error, FeedbackRecord, Result};
use feedback_database::{FeedbackStore, InMemoryFeedbackStore};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

/// Fixed timestamp helper, UTC
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

/// Build a record with the given fields
pub fn record(owner: &str, text: &str, rating: i16, created_at: DateTime<Utc>) -> FeedbackRecord {
    FeedbackRecord {
        id: Uuid::new_v4(),
        owner_id: owner.to_string(),
        text: text.to_string(),
        rating,
        created_at,
    }
}

/// Two owners with distinct feedback
pub fn sample_records() -> Vec<FeedbackRecord> {
    vec![
        record("acme", "Great service, great staff", 5, at(2023, 1, 1, 9)),
        record("acme", "Slow delivery", 2, at(2023, 1, 1, 15)),
        record("acme", "Service was great", 4, at(2023, 1, 2, 10)),
        record("globex", "Terrible checkout experience", 1, at(2023, 2, 1, 12)),
    ]
}

/// Router over an in-memory store seeded with `records`
pub fn app_with(records: Vec<FeedbackRecord>) -> (Router, InMemoryFeedbackStore) {
    let store = InMemoryFeedbackStore::with_records(records);
    let app = feedback_api::build_router(Config::default(), Arc::new(store.clone()))
        .expect("router builds");
    (app, store)
}

/// Store whose every operation fails
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl FeedbackStore for FailingStore {
    async fn feedbacks(&self, _owner: Option<&str>) -> Result<Vec<FeedbackRecord>> {
        Err(Error::Database("connection refused".to_string()))
    }

    async fn insert(&self, _record: FeedbackRecord) -> Result<FeedbackRecord> {
        Err(Error::Database("connection refused".to_string()))
    }

    async fn health_check(&self) -> Result<()> {
        Err(Error::Database("connection refused".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Router whose store always fails
pub fn failing_app() -> Router {
    feedback_api::build_router(Config::default(), Arc::new(FailingStore)).expect("router builds")
}

/// Send a GET, optionally scoped to an owner
pub async fn get(app: &Router, uri: &str, owner: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(owner) = owner {
        builder = builder.header("X-Owner-Id", owner);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

/// Send a JSON POST
pub async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

/// Decode a JSON body
pub fn json<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).expect("valid JSON body")
}
