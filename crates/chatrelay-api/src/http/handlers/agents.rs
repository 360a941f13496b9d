//! Agent catalogue endpoint.

use axum::Json;
use axum::extract::State;

use chatrelay_core::backend::catalog;

use crate::http::extractors::auth::AuthUser;
use crate::http::response::AgentsResponse;
use crate::state::AppState;

/// GET /api/agents - Known agents; backend ids only for configured ones.
pub async fn list_agents(State(state): State<AppState>, user: AuthUser) -> Json<AgentsResponse> {
    tracing::debug!(user_id = %user.user_id, "listing agents");
    Json(AgentsResponse {
        success: true,
        agents: catalog::list_agents(&state.config.agents),
    })
}
