//! Bearer token extractors.
//!
//! [`BearerHeader`] hands the raw `Authorization` value to handlers that
//! report auth failures in their own body (chat). [`AuthUser`] verifies the
//! token up front and rejects with 401.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use chatrelay_core::auth::token::authenticate;

use crate::http::error::AppError;
use crate::state::AppState;

/// Raw `Authorization` header value. Never rejects.
#[derive(Debug, Default)]
pub struct BearerHeader(pub Option<String>);

impl BearerHeader {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for BearerHeader {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(authorization_header(parts).map(str::to_string)))
    }
}

/// Verified caller. Extracting this validates the bearer token.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_id = authenticate(state.tokens.as_ref(), authorization_header(parts))?;
        Ok(Self { user_id })
    }
}

/// Header values that are not valid visible ASCII count as absent.
fn authorization_header(parts: &Parts) -> Option<&str> {
    parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}
