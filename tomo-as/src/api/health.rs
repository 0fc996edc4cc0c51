//! Health check endpoint
//!
//! Reports liveness plus what this instance stores into and how many
//! flow sessions it is holding.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// Storage backend: `sqlite`, `file` or `memory`
    pub backend: &'static str,
    pub slot: String,
    pub sessions: usize,
    pub session_ttl_secs: u64,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: "tomo-as",
        version: env!("CARGO_PKG_VERSION"),
        backend: state.store.backend_name(),
        slot: state.store.slot().to_string(),
        sessions: state.sessions.len().await,
        session_ttl_secs: state.sessions.idle_ttl().as_secs(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
