//! StreamRelay: folds a backend fragment stream into a session record.
//!
//! The relay is the only writer for a session while it is `processing`. It
//! keeps the authoritative chunk buffer in memory and persists it every
//! `checkpoint_interval` fragments, then once more on exhaustion with the
//! terminal `completed` status.

use std::sync::Arc;

use chrono::Utc;
use futures_util::StreamExt;

use chatrelay_types::agent::AgentTarget;
use chatrelay_types::error::{AgentError, RelayError};
use chatrelay_types::session::SessionUpdate;

use crate::backend::agent::AgentBackend;
use crate::session::store::SessionStore;

/// Summary of one successful relay run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    pub fragments: usize,
    pub response_len: usize,
    /// Checkpoint writes that were persisted. Excludes the terminal write.
    pub checkpoints: usize,
}

/// Drives one backend invocation to exhaustion and persists its progress.
///
/// Generic over the store and backend so tests can substitute in-memory
/// implementations.
pub struct StreamRelay<S: SessionStore, B: AgentBackend> {
    store: Arc<S>,
    backend: Arc<B>,
    checkpoint_interval: usize,
}

impl<S: SessionStore, B: AgentBackend> StreamRelay<S, B> {
    /// A `checkpoint_interval` of 0 is treated as 1.
    pub fn new(store: Arc<S>, backend: Arc<B>, checkpoint_interval: usize) -> Self {
        Self {
            store,
            backend,
            checkpoint_interval: checkpoint_interval.max(1),
        }
    }

    pub fn checkpoint_interval(&self) -> usize {
        self.checkpoint_interval
    }

    /// Relay `message` for `session_id` through `target`.
    ///
    /// A backend error before exhaustion is returned as [`RelayError::Agent`]
    /// with nothing persisted for it; recording the failure is left to the
    /// caller. A failed terminal write is returned as [`RelayError::Store`].
    #[tracing::instrument(
        skip(self, target, message),
        fields(agent_id = %target.short_id(), backend = self.backend.name())
    )]
    pub async fn run(
        &self,
        target: &AgentTarget,
        session_id: &str,
        message: &str,
    ) -> Result<RelayOutcome, RelayError> {
        let mut stream = self.backend.invoke(target, session_id, message);

        let mut chunks: Vec<String> = Vec::new();
        let mut response = String::new();
        let mut checkpoints = 0usize;

        while let Some(item) = stream.next().await {
            let bytes = item?;
            let text = String::from_utf8(bytes).map_err(|e| AgentError::Decode(e.to_string()))?;

            response.push_str(&text);
            chunks.push(text);
            let chunk_index = chunks.len() - 1;
            tracing::debug!(session_id, chunk_index, "received fragment");

            if chunks.len() % self.checkpoint_interval == 0 {
                let update = SessionUpdate::checkpoint(&chunks, &response, Utc::now());
                match self.store.update_partial(session_id, &update).await {
                    Ok(()) => checkpoints += 1,
                    Err(e) => {
                        tracing::warn!(
                            session_id,
                            chunk_count = chunks.len(),
                            error = %e,
                            "checkpoint write failed, continuing"
                        );
                    }
                }
            }
        }

        let outcome = RelayOutcome {
            fragments: chunks.len(),
            response_len: response.len(),
            checkpoints,
        };

        self.store
            .update_partial(session_id, &SessionUpdate::completed(chunks, response, Utc::now()))
            .await?;

        tracing::info!(
            session_id,
            chunk_count = outcome.fragments,
            response_len = outcome.response_len,
            "relay completed"
        );
        Ok(outcome)
    }
}
