use axum::Json;
use axum::extract::State;
use serde::Serialize;

use floorwatch_core::time::timestamp_now;

use crate::state::AppState;

/// Structured health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub roster: usize,
    pub failure_rate: f64,
    pub checked_at: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        roster: state.roster.len(),
        failure_rate: state.config.floor.failure_rate,
        checked_at: timestamp_now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "healthy",
            version: "0.1.0",
            roster: 8,
            failure_rate: 0.0,
            checked_at: "2026-01-01T09:00:00Z".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"healthy\""));
        assert!(json.contains("\"roster\":8"));
    }
}
