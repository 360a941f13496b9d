//! StatusQuery: incremental polling reads of a session.

use std::sync::Arc;

use chatrelay_types::chat::StatusResponse;
use chatrelay_types::error::StoreError;

use crate::session::store::SessionStore;

/// Read-only view over the session store for pollers.
pub struct StatusQuery<S: SessionStore> {
    store: Arc<S>,
}

impl<S: SessionStore> StatusQuery<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Current status plus every chunk after `last_chunk_index`.
    ///
    /// Pass -1 (or any negative index) to receive the full history. Unknown
    /// or expired sessions yield [`StoreError::NotFound`].
    pub async fn query(
        &self,
        session_id: &str,
        last_chunk_index: i64,
    ) -> Result<StatusResponse, StoreError> {
        let record = self.store.read(session_id).await?;
        let response = StatusResponse::from_record(&record, last_chunk_index);
        tracing::debug!(
            session_id,
            status = %response.status,
            chunk_count = response.total_chunks,
            new_chunks = response.chunks.len(),
            "status polled"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::session::{SessionRecord, SessionStatus, SessionUpdate};
    use chrono::Utc;

    use crate::session::memory::MemorySessionStore;

    async fn store_with_chunks(chunks: &[&str]) -> Arc<MemorySessionStore> {
        let store = Arc::new(MemorySessionStore::new());
        let record = SessionRecord::new_processing("s1", "u1", "supervisor", "Hi", Utc::now(), 60);
        store.create(&record).await.unwrap();
        let chunks: Vec<String> = chunks.iter().map(|c| c.to_string()).collect();
        store
            .update_partial("s1", &SessionUpdate::checkpoint(&chunks, &chunks.concat(), Utc::now()))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let query = StatusQuery::new(Arc::new(MemorySessionStore::new()));
        assert!(matches!(query.query("abc", -1).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn returns_only_new_chunks() {
        let query = StatusQuery::new(store_with_chunks(&["a", "b", "c", "d"]).await);

        let all = query.query("s1", -1).await.unwrap();
        assert_eq!(all.chunks.len(), 4);
        assert_eq!(all.status, SessionStatus::Processing);

        let newer = query.query("s1", 1).await.unwrap();
        assert_eq!(newer.chunks, vec!["c", "d"]);
        assert_eq!(newer.response, "abcd");
        assert_eq!(newer.total_chunks, 4);
    }

    #[tokio::test]
    async fn repeated_polls_are_stable() {
        let query = StatusQuery::new(store_with_chunks(&["a", "b"]).await);
        let first = query.query("s1", 1).await.unwrap();
        let second = query.query("s1", 1).await.unwrap();
        assert_eq!(first, second);
        assert!(first.chunks.is_empty());
    }

    #[tokio::test]
    async fn error_message_is_reported() {
        let store = store_with_chunks(&["partial"]).await;
        store
            .update_partial("s1", &SessionUpdate::failed("throttlingException: slow", Utc::now()))
            .await
            .unwrap();
        let status = StatusQuery::new(store).query("s1", -1).await.unwrap();
        assert_eq!(status.status, SessionStatus::Error);
        assert_eq!(status.error_message.as_deref(), Some("throttlingException: slow"));
        assert_eq!(status.chunks, vec!["partial"]);
    }
}
