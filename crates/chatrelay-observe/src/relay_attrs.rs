//! Span names and structured field names used across chatrelay.
//!
//! Span names are constants so dashboards and log queries have one place to
//! look. Field names are listed for reference; `tracing` macros need them as
//! identifiers, so call sites spell them literally.

// --- Span names ---

/// One `POST /api/chat` request, from authentication to the terminal write.
pub const SPAN_CHAT_REQUEST: &str = "chat.request";

/// One `GET /api/chat/status/{sessionId}` poll.
pub const SPAN_STATUS_POLL: &str = "chat.status";

/// One `POST /api/login` attempt.
pub const SPAN_LOGIN: &str = "auth.login";

/// One pass of the expired-session sweeper.
pub const SPAN_PURGE: &str = "session.purge";

// --- Field names ---

/// Session identifier (UUID v4 unless the caller chose one).
pub const FIELD_SESSION_ID: &str = "session_id";

/// Zero-based index of the fragment just received.
pub const FIELD_CHUNK_INDEX: &str = "chunk_index";

/// Fragments received so far.
pub const FIELD_CHUNK_COUNT: &str = "chunk_count";

/// First eight characters of the backend agent id.
pub const FIELD_AGENT_ID: &str = "agent_id";

/// Authenticated caller.
pub const FIELD_USER_ID: &str = "user_id";

/// Service name reported to OpenTelemetry.
pub const SERVICE_NAME: &str = "chatrelay";
