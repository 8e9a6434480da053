//! Aggregation server.
//!
//! Accepts session reports from remote agents, merges in this machine's own
//! detection pass on every list request, and expires sessions that stop
//! reporting. State is a single in-memory map behind an async RwLock.

pub mod store;

use crate::config::{SESSION_EXPIRY_MS, SWEEP_INTERVAL_SECS};
use crate::data::RemoteSession;
use crate::detector::SessionDetector;
use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use store::SessionStore;
use tokio::sync::RwLock;

/// Shared state behind every handler.
pub struct AppState {
    pub store: RwLock<SessionStore>,
    pub detector: SessionDetector,
    pub machine_name: String,
}

impl AppState {
    pub fn new(machine_name: String) -> Self {
        Self::with_detector(machine_name, SessionDetector::new())
    }

    /// State with a custom detector (used for testing).
    pub fn with_detector(machine_name: String, detector: SessionDetector) -> Self {
        Self {
            store: RwLock::new(SessionStore::new(SESSION_EXPIRY_MS)),
            detector,
            machine_name,
        }
    }
}

/// Build the router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/sessions/report", post(report_sessions))
        .route("/api/sessions", get(list_sessions))
        .route("/api/health", get(health))
        .with_state(state)
}

/// Run the server on the given port until the process exits.
pub async fn run(port: u16, machine_name: String) -> Result<()> {
    let state = Arc::new(AppState::new(machine_name));
    spawn_sweeper(Arc::clone(&state));

    let app = router(Arc::clone(&state));
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Session server running on http://{}", addr);
    tracing::info!("Machine: {}", state.machine_name);
    tracing::info!("API available at http://localhost:{}/api/sessions", port);
    tracing::info!(
        "Point remote agents at SERVER_URL=http://<this-machine-ip>:{}",
        port
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically drop sessions that have stopped reporting.
fn spawn_sweeper(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            let removed = state.store.write().await.sweep();
            if removed > 0 {
                tracing::info!("Expired {} stale session(s)", removed);
            }
        }
    });
}

/// POST /api/sessions/report
///
/// Body: `{"sessions": [...]}`. Each session is stored whole under its
/// machine:session key, lastActive exactly as reported. A malformed payload
/// leaves the store untouched.
async fn report_sessions(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(raw) = body.get("sessions").and_then(Value::as_array) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid request: sessions must be an array" })),
        );
    };

    let sessions: Vec<RemoteSession> = match raw
        .iter()
        .map(|s| serde_json::from_value(s.clone()))
        .collect::<Result<_, _>>()
    {
        Ok(sessions) => sessions,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid session in report: {}", e) })),
            );
        }
    };

    let received = sessions.len();
    let mut store = state.store.write().await;
    for session in sessions {
        store.upsert(session);
    }
    tracing::debug!("Stored {} reported session(s)", received);

    (
        StatusCode::OK,
        Json(json!({ "success": true, "received": received })),
    )
}

/// GET /api/sessions
///
/// Runs a local detection pass, merges it into the store under this
/// server's machine name, and returns everything, newest first.
async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<Value> {
    let local = state.detector.detect().await;

    let mut store = state.store.write().await;
    for session in local {
        store.upsert(RemoteSession {
            session,
            machine_name: state.machine_name.clone(),
        });
    }
    let sessions = store.snapshot();
    drop(store);

    Json(json!({ "sessions": sessions }))
}

/// GET /api/health
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().timestamp_millis(),
    }))
}
