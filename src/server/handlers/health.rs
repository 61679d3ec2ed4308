use crate::server::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of configured fan-out targets.
    pub destinations: usize,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Liveness report; never touches the destinations.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    let uptime_seconds = (now - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        destinations: state.relay.destinations().len(),
        uptime_seconds,
        timestamp: now,
    })
}
