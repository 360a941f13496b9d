//! Query parameter extractors.

use serde::Deserialize;

use crate::http::error::AppError;

/// Query of `GET /api/chat/status/{sessionId}`.
///
/// Kept as a string so a bad value can be reported in the
/// `{errorMessage}` shape instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    #[serde(rename = "lastChunkIndex")]
    pub last_chunk_index: Option<String>,
}

impl StatusParams {
    /// Parsed index; absent or blank means -1 (nothing seen yet).
    pub fn last_chunk_index(&self) -> Result<i64, AppError> {
        match self.last_chunk_index.as_deref().map(str::trim) {
            None | Some("") => Ok(-1),
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::BadQuery(format!("lastChunkIndex must be an integer, got '{raw}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(raw: Option<&str>) -> StatusParams {
        StatusParams {
            last_chunk_index: raw.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_to_minus_one() {
        assert_eq!(params(None).last_chunk_index().unwrap(), -1);
        assert_eq!(params(Some("  ")).last_chunk_index().unwrap(), -1);
    }

    #[test]
    fn test_parses_integers() {
        assert_eq!(params(Some("4")).last_chunk_index().unwrap(), 4);
        assert_eq!(params(Some("-7")).last_chunk_index().unwrap(), -7);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            params(Some("two")).last_chunk_index(),
            Err(AppError::BadQuery(msg)) if msg.contains("two")
        ));
    }
}
