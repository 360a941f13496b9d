//! Chat submission endpoint.
//!
//! POST /api/chat
//!
//! Always answers 200. The body is parsed here rather than through the
//! `Json` extractor so that a malformed payload still produces a
//! [`ChatResponse`] (after authentication) instead of an axum rejection.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use tracing::Instrument;

use chatrelay_observe::relay_attrs::SPAN_CHAT_REQUEST;
use chatrelay_types::chat::{ChatRequest, ChatResponse};

use crate::http::extractors::auth::BearerHeader;
use crate::state::AppState;

/// POST /api/chat - Relay one message to the supervisor agent.
pub async fn send_message(
    State(state): State<AppState>,
    authorization: BearerHeader,
    body: Bytes,
) -> Json<ChatResponse> {
    let intake = state.chat_intake.clone();
    let response = async move {
        match parse_body(&body) {
            Ok(request) => intake.handle(authorization.as_deref(), request).await,
            Err(e) => intake.handle_malformed(authorization.as_deref(), &e.to_string()),
        }
    }
    .instrument(tracing::info_span!(SPAN_CHAT_REQUEST))
    .await;

    Json(response)
}

/// An empty body is an empty request, which then fails validation.
fn parse_body(body: &[u8]) -> Result<ChatRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ChatRequest::default());
    }
    serde_json::from_slice(body)
}
