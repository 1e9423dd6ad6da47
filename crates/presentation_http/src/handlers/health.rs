//! Health check handlers

use application::RefreshOutcome;
use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    /// Accepted stations with a readable cached observation
    pub cached_stations: usize,
    /// Size of the accepted station list
    pub accepted_stations: usize,
    pub last_refresh: Option<RefreshOutcome>,
    pub last_refresh_at: Option<DateTime<Utc>>,
}

/// Readiness check - is there anything to serve yet?
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let cached_stations = state.metar_service.cached_station_count().await;
    let status = state.ingestion.last_status();

    let ready = cached_stations > 0;
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready,
            cached_stations,
            accepted_stations: state.metar_service.catalog().stations.len(),
            last_refresh: status.map(|s| s.outcome),
            last_refresh_at: status.map(|s| s.finished_at),
        }),
    )
}
