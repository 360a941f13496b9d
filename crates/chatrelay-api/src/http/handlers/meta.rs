//! Unauthenticated informational endpoints.

use axum::Json;

use crate::http::response::{HealthResponse, api_documentation};

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET / - Static API documentation.
pub async fn docs() -> Json<serde_json::Value> {
    Json(api_documentation())
}
