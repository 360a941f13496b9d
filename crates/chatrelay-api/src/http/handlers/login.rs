//! Login endpoint.
//!
//! POST /api/login

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use tracing::Instrument;

use chatrelay_observe::relay_attrs::SPAN_LOGIN;
use chatrelay_types::error::LoginError;
use chatrelay_types::user::{LoginRequest, LoginResponse};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/login - Exchange email and password for an access token.
///
/// A body that is not a JSON object with string fields is treated like one
/// with missing credentials.
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoginResponse>, AppError> {
    let request: LoginRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "unreadable login body");
        LoginError::MissingCredentials
    })?;

    let response = state
        .user_service
        .login(&request)
        .instrument(tracing::info_span!(SPAN_LOGIN))
        .await?;

    Ok(Json(response))
}
