//! HTTP/REST API layer for chatrelay.
//!
//! Axum-based REST API under `/api/` with bearer-token authentication
//! and CORS support. `/` and `/health` sit at the root.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
