use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json, Response};
use rand::Rng;
use serde::Deserialize;

use floorwatch_core::floor::{AgentDetailResponse, FloorResponse, RosterResponse};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/manager/floor: the calls currently in progress.
pub async fn get_floor(State(state): State<AppState>) -> Result<Json<FloorResponse>, AppError> {
    let mut rng = rand::rng();

    let failure_rate = state.config.floor.failure_rate;
    if failure_rate > 0.0 && rng.random_bool(failure_rate) {
        tracing::debug!(failure_rate, "Injecting floor failure");
        return Err(AppError::Internal("floor data unavailable".to_string()));
    }

    let calls = state
        .generator
        .generate(&state.roster, chrono::Utc::now(), &mut rng);
    tracing::trace!(count = calls.len(), "Generated floor calls");
    Ok(Json(FloorResponse { calls }))
}

/// Query string for the agents endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AgentsQuery {
    #[serde(rename = "agentId")]
    pub agent_id: Option<String>,
}

/// GET /api/manager/agents: the full roster, or one agent with `?agentId=`.
pub async fn get_agents(
    State(state): State<AppState>,
    Query(query): Query<AgentsQuery>,
) -> Result<Response, AppError> {
    let Some(agent_id) = query.agent_id else {
        let agents = state.roster.as_ref().clone();
        return Ok(Json(RosterResponse { agents }).into_response());
    };

    if agent_id.is_empty() {
        return Err(AppError::BadRequest("agentId must not be empty".to_string()));
    }

    let agent = state
        .roster
        .iter()
        .find(|a| a.id == agent_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Agent {agent_id} not found")))?;
    Ok(Json(AgentDetailResponse { agent }).into_response())
}
