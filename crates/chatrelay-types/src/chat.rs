//! Wire types for the chat and status endpoints.
//!
//! Field names are camelCase on the wire to stay compatible with existing
//! web clients.

use serde::{Deserialize, Serialize};

use crate::session::{SessionRecord, SessionStatus};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub agent_type: Option<String>,
}

/// Failure category reported to clients in `errorType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    Auth,
    Validation,
    Config,
    Throttling,
    AgentError,
    Internal,
}

/// Body returned by `POST /api/chat`.
///
/// Always delivered with HTTP 200; `success` and `error_type` carry the
/// outcome so clients that treat non-2xx as fatal can still show a message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ChatResponse {
    /// Acknowledge an accepted message; the client polls for the answer.
    pub fn accepted(session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        Self {
            success: true,
            message: Some(format!(
                "Response is being processed. Poll /api/chat/status/{session_id} for updates."
            )),
            session_id: Some(session_id),
            status: Some(SessionStatus::Processing),
            ..Default::default()
        }
    }

    /// A failure carrying only an error category and message.
    pub fn failure(error_type: ErrorType, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            error_type: Some(error_type),
            ..Default::default()
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.retry_after = Some(secs);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Body returned by `GET /api/chat/status/{sessionId}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: SessionStatus,
    pub routed_agent_type: Option<String>,
    /// Only the chunks after the caller's last-seen index.
    pub chunks: Vec<String>,
    pub total_chunks: usize,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl StatusResponse {
    /// Project a record into a poll result, returning only chunks with an
    /// index strictly greater than `last_chunk_index`. Any negative index
    /// means nothing has been seen yet.
    pub fn from_record(record: &SessionRecord, last_chunk_index: i64) -> Self {
        let start = if last_chunk_index < 0 {
            0
        } else {
            usize::try_from(last_chunk_index)
                .map(|i| i.saturating_add(1))
                .unwrap_or(usize::MAX)
        };
        let chunks = record.chunks.get(start..).map(<[String]>::to_vec).unwrap_or_default();

        Self {
            status: record.status,
            routed_agent_type: record.routed_agent_type.clone(),
            chunks,
            total_chunks: record.chunks.len(),
            response: record.response.clone(),
            error_message: record.error_message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record_with(chunks: &[&str]) -> SessionRecord {
        let mut record =
            SessionRecord::new_processing("s1", "u1", "supervisor", "Hello", Utc::now(), 60);
        record.chunks = chunks.iter().map(|c| c.to_string()).collect();
        record.response = chunks.concat();
        record
    }

    #[test]
    fn test_chat_request_camel_case() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"message":"Hi","sessionId":"abc","agentType":"coding"}"#,
        )
        .unwrap();
        assert_eq!(req.message, "Hi");
        assert_eq!(req.session_id.as_deref(), Some("abc"));
        assert_eq!(req.agent_type.as_deref(), Some("coding"));
    }

    #[test]
    fn test_chat_request_missing_message_defaults_empty() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(req.message.is_empty());
        assert!(req.session_id.is_none());
    }

    #[test]
    fn test_error_type_wire_names() {
        assert_eq!(serde_json::to_string(&ErrorType::AgentError).unwrap(), "\"agent_error\"");
        assert_eq!(serde_json::to_string(&ErrorType::Throttling).unwrap(), "\"throttling\"");
    }

    #[test]
    fn test_accepted_response_shape() {
        let json = serde_json::to_value(ChatResponse::accepted("abc")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["sessionId"], "abc");
        assert_eq!(json["status"], "processing");
        assert!(json["message"].as_str().unwrap().contains("/api/chat/status/abc"));
        assert!(json.get("errorType").is_none());
        assert!(json.get("retryAfter").is_none());
    }

    #[test]
    fn test_throttling_response_shape() {
        let resp = ChatResponse::failure(ErrorType::Throttling, "slow down")
            .with_session("abc")
            .with_retry_after(60);
        let json = serde_json::to_value(resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errorType"], "throttling");
        assert_eq!(json["retryAfter"], 60);
        assert_eq!(json["sessionId"], "abc");
    }

    #[test]
    fn test_status_all_chunks_when_unset() {
        let record = record_with(&["a", "b", "c"]);
        let status = StatusResponse::from_record(&record, -1);
        assert_eq!(status.chunks, vec!["a", "b", "c"]);
        assert_eq!(status.total_chunks, 3);
        assert_eq!(status.response, "abc");
    }

    #[test]
    fn test_status_only_newer_chunks() {
        let record = record_with(&["a", "b", "c", "d"]);
        let status = StatusResponse::from_record(&record, 1);
        assert_eq!(status.chunks, vec!["c", "d"]);
        assert_eq!(status.total_chunks, 4);
    }

    #[test]
    fn test_status_index_past_end_is_empty() {
        let record = record_with(&["a", "b"]);
        assert!(StatusResponse::from_record(&record, 1).chunks.is_empty());
        assert!(StatusResponse::from_record(&record, 50).chunks.is_empty());
        assert!(StatusResponse::from_record(&record, i64::MAX).chunks.is_empty());
    }

    #[test]
    fn test_status_other_negative_index_returns_everything() {
        let record = record_with(&["a", "b"]);
        assert_eq!(StatusResponse::from_record(&record, -7).chunks.len(), 2);
    }

    #[test]
    fn test_status_wire_shape() {
        let record = record_with(&["x"]);
        let json = serde_json::to_value(StatusResponse::from_record(&record, -1)).unwrap();
        assert_eq!(json["status"], "processing");
        assert!(json["routedAgentType"].is_null());
        assert_eq!(json["totalChunks"], 1);
        assert!(json.get("errorMessage").is_none());
    }
}
