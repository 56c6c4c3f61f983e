//! In-process stand-in for the HawkFlow ingestion API.
//!
//! Accepts `POST /v1/{start,end,exception,metrics}`, checks the
//! `x-hawkflow-api-key` header, and records every accepted event so tests can
//! assert on what the client actually put on the wire. `fail_next` makes the
//! server answer 500 for a number of requests to exercise client retries.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "x-hawkflow-api-key";

const KINDS: [&str; 4] = ["start", "end", "exception", "metrics"];

/// Event body as the real API accepts it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub process: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<BTreeMap<String, f64>>,
}

/// An accepted event together with the path it was posted to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub id: Uuid,
    pub kind: String,
    pub event: Event,
}

#[derive(Serialize, Deserialize)]
pub struct Created {
    pub id: Uuid,
}

/// Shared server state. Cloning shares the same event log and counters.
#[derive(Clone)]
pub struct MockState {
    api_key: Arc<String>,
    events: Arc<RwLock<Vec<RecordedEvent>>>,
    pending_failures: Arc<AtomicU32>,
    hits: Arc<AtomicU32>,
}

impl MockState {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Arc::new(api_key.into()),
            events: Arc::new(RwLock::new(Vec::new())),
            pending_failures: Arc::new(AtomicU32::new(0)),
            hits: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Answer the next `count` authorized requests with 500.
    pub fn fail_next(&self, count: u32) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    /// Requests received on any event route, accepted or not.
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    pub async fn events(&self) -> Vec<RecordedEvent> {
        self.events.read().await.clone()
    }

    fn take_failure(&self) -> bool {
        self.pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/v1/{kind}", post(record_event))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn record_event(
    State(state): State<MockState>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !KINDS.contains(&kind.as_str()) {
        return StatusCode::NOT_FOUND.into_response();
    }
    state.hits.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| key == state.api_key.as_str());
    if !authorized {
        tracing::warn!(%kind, "rejected request with bad API key");
        return (StatusCode::UNAUTHORIZED, "Invalid API key").into_response();
    }

    if state.take_failure() {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }

    let event: Event = match serde_json::from_str(&body) {
        Ok(event) => event,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    if event.process.is_empty() {
        return (StatusCode::BAD_REQUEST, "process is required").into_response();
    }

    let recorded = RecordedEvent {
        id: Uuid::new_v4(),
        kind,
        event,
    };
    tracing::info!(id = %recorded.id, kind = %recorded.kind, process = %recorded.event.process, "event recorded");

    let id = recorded.id;
    state.events.write().await.push(recorded);
    (StatusCode::CREATED, Json(Created { id })).into_response()
}
