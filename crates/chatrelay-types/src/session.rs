//! Session record types for the chat relay.
//!
//! A [`SessionRecord`] is the persisted unit of state for one chat session:
//! the user's message, the fragments streamed back by the agent backend so far,
//! and the lifecycle status that pollers observe.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Records expire 24 hours after creation.
pub const SESSION_TTL_SECS: i64 = 86_400;

/// Agent type recorded when the caller does not name one.
pub const DEFAULT_AGENT_TYPE: &str = "supervisor";

/// Lifecycle status of a chat session.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('processing', 'completed', 'error'))`
///
/// Transitions are monotonic: `Processing` moves to exactly one of the
/// terminal states and never back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Processing,
    Completed,
    Error,
}

impl SessionStatus {
    /// Whether no further mutation of chunks/response may happen.
    pub fn is_terminal(self) -> bool {
        !matches!(self, SessionStatus::Processing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Processing => "processing",
            SessionStatus::Completed => "completed",
            SessionStatus::Error => "error",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "processing" => Ok(SessionStatus::Processing),
            "completed" => Ok(SessionStatus::Completed),
            "error" => Ok(SessionStatus::Error),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

/// One chat session, keyed by `session_id`.
///
/// `response` is always the ordered concatenation of `chunks` as of the last
/// persist; it is stored alongside the chunks so readers never re-join them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub status: SessionStatus,
    pub requested_agent_type: String,
    pub routed_agent_type: Option<String>,
    pub message: String,
    pub chunks: Vec<String>,
    pub response: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Absolute expiry as unix seconds.
    pub ttl: i64,
}

impl SessionRecord {
    /// Build a fresh record in `Processing` state with no chunks.
    pub fn new_processing(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        requested_agent_type: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
        ttl_secs: i64,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            status: SessionStatus::Processing,
            requested_agent_type: requested_agent_type.into(),
            routed_agent_type: None,
            message: message.into(),
            chunks: Vec::new(),
            response: String::new(),
            error_message: None,
            created_at: now,
            last_updated: None,
            completed_at: None,
            ttl: (now + Duration::seconds(ttl_secs)).timestamp(),
        }
    }

    /// Whether the record has outlived its TTL at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.ttl <= now.timestamp()
    }

    /// Apply a partial update in memory. Used by stores that hold records
    /// as values rather than rows.
    pub fn apply(&mut self, update: &SessionUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(chunks) = &update.chunks {
            self.chunks = chunks.clone();
        }
        if let Some(response) = &update.response {
            self.response = response.clone();
        }
        if let Some(error_message) = &update.error_message {
            self.error_message = Some(error_message.clone());
        }
        if let Some(routed) = &update.routed_agent_type {
            self.routed_agent_type = Some(routed.clone());
        }
        if let Some(ts) = update.last_updated {
            self.last_updated = Some(ts);
        }
        if let Some(ts) = update.completed_at {
            self.completed_at = Some(ts);
        }
    }
}

/// Named-field update applied atomically by `SessionStore::update_partial`.
///
/// Only `Some` fields are written; everything else on the record is left as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionUpdate {
    pub status: Option<SessionStatus>,
    pub chunks: Option<Vec<String>>,
    pub response: Option<String>,
    pub error_message: Option<String>,
    pub routed_agent_type: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionUpdate {
    /// Periodic checkpoint of streamed progress.
    pub fn checkpoint(chunks: &[String], response: &str, now: DateTime<Utc>) -> Self {
        Self {
            chunks: Some(chunks.to_vec()),
            response: Some(response.to_string()),
            last_updated: Some(now),
            ..Default::default()
        }
    }

    /// Terminal write for a stream that ran to exhaustion.
    pub fn completed(chunks: Vec<String>, response: String, now: DateTime<Utc>) -> Self {
        Self {
            status: Some(SessionStatus::Completed),
            chunks: Some(chunks),
            response: Some(response),
            last_updated: Some(now),
            completed_at: Some(now),
            ..Default::default()
        }
    }

    /// Terminal write for a failed relay.
    pub fn failed(error_message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            status: Some(SessionStatus::Error),
            error_message: Some(error_message.into()),
            last_updated: Some(now),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_roundtrip() {
        for status in [
            SessionStatus::Processing,
            SessionStatus::Completed,
            SessionStatus::Error,
        ] {
            let parsed: SessionStatus = status.to_string().parse().unwrap();
            assert_eq!(status, parsed);
        }
        assert!("crashed".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_session_status_serde() {
        let json = serde_json::to_string(&SessionStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!SessionStatus::Processing.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Error.is_terminal());
        assert_eq!(SessionStatus::default(), SessionStatus::Processing);
    }

    #[test]
    fn test_new_record_ttl_is_24h() {
        let now = Utc::now();
        let record =
            SessionRecord::new_processing("s1", "u1", DEFAULT_AGENT_TYPE, "Hello", now, SESSION_TTL_SECS);
        assert_eq!(record.ttl - now.timestamp(), 86_400);
        assert_eq!(record.status, SessionStatus::Processing);
        assert!(record.chunks.is_empty());
        assert!(record.response.is_empty());
        assert!(!record.is_expired(now));
        assert!(record.is_expired(now + Duration::seconds(SESSION_TTL_SECS)));
    }

    #[test]
    fn test_apply_only_touches_named_fields() {
        let now = Utc::now();
        let mut record = SessionRecord::new_processing("s1", "u1", "coding", "Hi", now, 60);
        let chunks = vec!["a".to_string(), "b".to_string()];
        record.apply(&SessionUpdate::checkpoint(&chunks, "ab", now));

        assert_eq!(record.chunks, chunks);
        assert_eq!(record.response, "ab");
        assert_eq!(record.status, SessionStatus::Processing);
        assert_eq!(record.requested_agent_type, "coding");
        assert_eq!(record.message, "Hi");
        assert!(record.completed_at.is_none());
    }

    #[test]
    fn test_failed_update_keeps_chunks() {
        let now = Utc::now();
        let mut record = SessionRecord::new_processing("s1", "u1", "supervisor", "Hi", now, 60);
        record.apply(&SessionUpdate::checkpoint(&["x".to_string()], "x", now));
        record.apply(&SessionUpdate::failed("boom", now));

        assert_eq!(record.status, SessionStatus::Error);
        assert_eq!(record.error_message.as_deref(), Some("boom"));
        assert_eq!(record.chunks, vec!["x".to_string()]);
    }

    #[test]
    fn test_empty_update() {
        assert!(SessionUpdate::default().is_empty());
        assert!(!SessionUpdate::failed("x", Utc::now()).is_empty());
    }
}
