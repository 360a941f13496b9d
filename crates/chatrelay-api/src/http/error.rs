//! Application error type mapping to HTTP status codes.
//!
//! Two body shapes are in use: the login and catalogue endpoints answer
//! `{"success": false, "error": "..."}`, the status endpoint answers
//! `{"errorMessage": "..."}`. Chat never goes through here; it always
//! answers 200 with a [`ChatResponse`](chatrelay_types::chat::ChatResponse).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatrelay_types::error::{AuthError, LoginError, StoreError};

pub const SESSION_NOT_FOUND: &str = "Session not found";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Bearer token missing or rejected.
    Unauthorized(AuthError),
    /// Login failed.
    Login(LoginError),
    /// No live session under the requested id.
    SessionNotFound,
    /// A query parameter could not be parsed.
    BadQuery(String),
    /// Store failure while serving a status poll.
    Store(StoreError),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthorized(e)
    }
}

impl From<LoginError> for AppError {
    fn from(e: LoginError) -> Self {
        AppError::Login(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AppError::SessionNotFound,
            other => AppError::Store(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized(e) => failure(StatusCode::UNAUTHORIZED, e.to_string()),
            AppError::Login(LoginError::MissingCredentials) => {
                failure(StatusCode::BAD_REQUEST, LoginError::MissingCredentials.to_string())
            }
            AppError::Login(LoginError::InvalidCredentials) => {
                failure(StatusCode::UNAUTHORIZED, LoginError::InvalidCredentials.to_string())
            }
            AppError::Login(e) => {
                tracing::error!(error = %e, "login failed with an internal error");
                failure(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR.to_string())
            }
            AppError::SessionNotFound => error_message(StatusCode::NOT_FOUND, SESSION_NOT_FOUND.to_string()),
            AppError::BadQuery(msg) => error_message(StatusCode::BAD_REQUEST, msg),
            AppError::Store(e) => {
                tracing::error!(error = %e, "status poll failed");
                error_message(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

fn failure(status: StatusCode, error: String) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}

fn error_message(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "errorMessage": message }))).into_response()
}
