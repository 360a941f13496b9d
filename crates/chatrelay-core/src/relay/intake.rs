//! ChatIntake: the entry point of `POST /api/chat`.
//!
//! Authenticates, validates, writes the session record, runs the relay to
//! completion, and maps every outcome onto a [`ChatResponse`]. Nothing here
//! returns a transport error; failures are reported in the response body.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use chatrelay_types::agent::AgentTarget;
use chatrelay_types::chat::{ChatRequest, ChatResponse, ErrorType};
use chatrelay_types::error::RelayError;
use chatrelay_types::session::{DEFAULT_AGENT_TYPE, SESSION_TTL_SECS, SessionRecord, SessionUpdate};

use super::stream::StreamRelay;
use super::throttle::is_throttled;
use crate::auth::token::{TokenVerifier, authenticate};
use crate::backend::agent::AgentBackend;
use crate::session::store::SessionStore;

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const NOT_CONFIGURED: &str = "Agent service is not configured properly";
pub const THROTTLED: &str =
    "Too many requests. The AI service is temporarily rate-limited. Please wait a minute and try again.";
pub const AGENT_FAILED: &str = "Unable to process your request. Please try again.";
pub const INTERNAL: &str = "An unexpected error occurred. Please try again.";

/// Intake settings that are fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct IntakeSettings {
    /// Supervising agent every message is routed through. `None` means the
    /// service is not provisioned and every chat fails with `config`.
    pub supervisor: Option<AgentTarget>,
    pub session_ttl_secs: i64,
    pub retry_after_secs: u64,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            supervisor: None,
            session_ttl_secs: SESSION_TTL_SECS,
            retry_after_secs: 60,
        }
    }
}

/// Accepts chat messages and drives them through the relay.
pub struct ChatIntake<S: SessionStore, B: AgentBackend, V: TokenVerifier> {
    store: Arc<S>,
    relay: StreamRelay<S, B>,
    verifier: Arc<V>,
    settings: IntakeSettings,
}

impl<S: SessionStore, B: AgentBackend, V: TokenVerifier> ChatIntake<S, B, V> {
    pub fn new(
        store: Arc<S>,
        relay: StreamRelay<S, B>,
        verifier: Arc<V>,
        settings: IntakeSettings,
    ) -> Self {
        Self {
            store,
            relay,
            verifier,
            settings,
        }
    }

    /// Handle one chat submission. `authorization` is the raw header value.
    pub async fn handle(&self, authorization: Option<&str>, request: ChatRequest) -> ChatResponse {
        let user_id = match authenticate(self.verifier.as_ref(), authorization) {
            Ok(id) => id,
            Err(e) => {
                tracing::info!(error = %e, "chat rejected: authentication failed");
                return ChatResponse::failure(ErrorType::Auth, e.to_string());
            }
        };

        let message = request.message.as_str();
        if message.is_empty() {
            return ChatResponse::failure(ErrorType::Validation, MESSAGE_REQUIRED);
        }

        let Some(target) = self.settings.supervisor.as_ref() else {
            tracing::error!("chat rejected: supervisor agent is not configured");
            return ChatResponse::failure(ErrorType::Config, NOT_CONFIGURED);
        };

        let supplied_id = request.session_id.filter(|id| !id.trim().is_empty());
        let continuing = supplied_id.is_some();
        let session_id = supplied_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let agent_type = request
            .agent_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AGENT_TYPE.to_string());

        let record = SessionRecord::new_processing(
            &session_id,
            &user_id,
            agent_type,
            message,
            Utc::now(),
            self.settings.session_ttl_secs,
        );
        // A caller-supplied id continues an existing conversation, so the
        // previous record for it is overwritten. Generated ids must be new.
        let written = if continuing {
            self.store.replace(&record).await
        } else {
            self.store.create(&record).await
        };
        if let Err(e) = written {
            tracing::error!(session_id = %session_id, error = %e, "failed to write session");
            return ChatResponse::failure(ErrorType::Internal, INTERNAL).with_details(e.to_string());
        }
        tracing::info!(session_id = %session_id, user_id = %user_id, "session created");

        match self.relay.run(target, &session_id, message).await {
            Ok(_) => ChatResponse::accepted(session_id),
            Err(e) => self.fail(session_id, e).await,
        }
    }

    /// Handle a request whose body could not be parsed.
    ///
    /// Authentication still runs first so unauthenticated callers see an
    /// `auth` failure regardless of what they sent.
    pub fn handle_malformed(&self, authorization: Option<&str>, detail: &str) -> ChatResponse {
        if let Err(e) = authenticate(self.verifier.as_ref(), authorization) {
            return ChatResponse::failure(ErrorType::Auth, e.to_string());
        }
        tracing::warn!(detail, "chat rejected: malformed body");
        ChatResponse::failure(ErrorType::Internal, INTERNAL).with_details(detail)
    }

    /// Record the failure on the session and classify it for the client.
    async fn fail(&self, session_id: String, err: RelayError) -> ChatResponse {
        let raw = err.to_string();
        tracing::error!(session_id = %session_id, error = %raw, "relay failed");

        if let Err(write_err) = self
            .store
            .update_partial(&session_id, &SessionUpdate::failed(&raw, Utc::now()))
            .await
        {
            tracing::error!(
                session_id = %session_id,
                error = %write_err,
                "failed to record error status"
            );
            return ChatResponse::failure(ErrorType::Internal, INTERNAL)
                .with_session(session_id)
                .with_details(write_err.to_string());
        }

        if matches!(err, RelayError::Store(_)) {
            return ChatResponse::failure(ErrorType::Internal, INTERNAL)
                .with_session(session_id)
                .with_details(raw);
        }

        if is_throttled(&err) {
            ChatResponse::failure(ErrorType::Throttling, THROTTLED)
                .with_session(session_id)
                .with_retry_after(self.settings.retry_after_secs)
        } else {
            ChatResponse::failure(ErrorType::AgentError, AGENT_FAILED)
                .with_session(session_id)
                .with_details(raw)
        }
    }
}
