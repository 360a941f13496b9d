//! Session polling endpoint.
//!
//! GET /api/chat/status/{sessionId}?lastChunkIndex=N

use axum::Json;
use axum::extract::{Path, Query, State};
use tracing::Instrument;

use chatrelay_observe::relay_attrs::SPAN_STATUS_POLL;
use chatrelay_types::chat::StatusResponse;

use crate::http::error::AppError;
use crate::http::extractors::query::StatusParams;
use crate::state::AppState;

/// GET /api/chat/status/{sessionId} - Chunks after `lastChunkIndex` plus
/// the current status. Unknown or expired sessions are a 404.
pub async fn chat_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(params): Query<StatusParams>,
) -> Result<Json<StatusResponse>, AppError> {
    let last_chunk_index = params.last_chunk_index()?;

    let response = state
        .status_query
        .query(&session_id, last_chunk_index)
        .instrument(tracing::info_span!(
            SPAN_STATUS_POLL,
            session_id = %session_id,
            last_chunk_index
        ))
        .await?;

    Ok(Json(response))
}
