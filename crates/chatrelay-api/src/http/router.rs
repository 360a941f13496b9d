//! Axum router configuration with middleware.
//!
//! API routes are under `/api/`; documentation and health at the root.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::http::Method;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::send_message))
        .route("/chat/status/{session_id}", get(handlers::status::chat_status))
        .route("/login", post(handlers::login::login))
        .route("/agents", get(handlers::agents::list_agents));

    Router::new()
        .nest("/api", api_routes)
        .route("/", get(handlers::meta::docs))
        .route("/health", get(handlers::meta::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
