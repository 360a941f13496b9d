//! SQLite session store implementation.
//!
//! Implements `SessionStore` from `chatrelay-core` over the `chat_sessions`
//! table. Reads go to the reader pool, every mutation to the single-connection
//! writer pool. Chunks are stored as a JSON array in a TEXT column.

use chatrelay_core::session::store::SessionStore;
use chatrelay_types::error::StoreError;
use chatrelay_types::session::{SessionRecord, SessionStatus, SessionUpdate};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Row, Sqlite};

use super::pool::DatabasePool;

const UPSERT_SESSION: &str = r#"INSERT INTO chat_sessions (session_id, user_id, status, requested_agent_type,
       routed_agent_type, message, chunks, response, error_message, created_at, last_updated, completed_at, ttl)
   VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
   ON CONFLICT(session_id) DO UPDATE SET
       user_id = excluded.user_id,
       status = excluded.status,
       requested_agent_type = excluded.requested_agent_type,
       routed_agent_type = excluded.routed_agent_type,
       message = excluded.message,
       chunks = excluded.chunks,
       response = excluded.response,
       error_message = excluded.error_message,
       created_at = excluded.created_at,
       last_updated = excluded.last_updated,
       completed_at = excluded.completed_at,
       ttl = excluded.ttl"#;

/// SQLite-backed implementation of `SessionStore`.
#[derive(Clone)]
pub struct SqliteSessionStore {
    pool: DatabasePool,
}

impl SqliteSessionStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Insert `record`, overwriting any row with the same id. With
    /// `only_if_expired` set, a live row is left alone. Returns rows written.
    async fn upsert(&self, record: &SessionRecord, only_if_expired: bool) -> Result<u64, StoreError> {
        let sql = if only_if_expired {
            format!("{UPSERT_SESSION} WHERE chat_sessions.ttl <= ?")
        } else {
            UPSERT_SESSION.to_string()
        };

        let mut query = sqlx::query(&sql)
            .bind(&record.session_id)
            .bind(&record.user_id)
            .bind(record.status.as_str())
            .bind(&record.requested_agent_type)
            .bind(&record.routed_agent_type)
            .bind(&record.message)
            .bind(chunks_json(&record.chunks)?)
            .bind(&record.response)
            .bind(&record.error_message)
            .bind(format_datetime(&record.created_at))
            .bind(record.last_updated.as_ref().map(format_datetime))
            .bind(record.completed_at.as_ref().map(format_datetime))
            .bind(record.ttl);
        if only_if_expired {
            query = query.bind(Utc::now().timestamp());
        }

        let result = query
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(result.rows_affected())
    }

    /// Explain why a conditional update touched no rows.
    async fn classify_miss(&self, session_id: &str) -> StoreError {
        let row = sqlx::query("SELECT status, ttl FROM chat_sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.writer)
            .await;

        match row {
            Ok(Some(row)) => {
                let status: String = row.try_get("status").unwrap_or_default();
                let ttl: i64 = row.try_get("ttl").unwrap_or_default();
                if ttl <= Utc::now().timestamp() {
                    StoreError::NotFound
                } else {
                    StoreError::Conflict(format!("session '{session_id}' is already {status}"))
                }
            }
            Ok(None) => StoreError::NotFound,
            Err(e) => StoreError::Query(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct SessionRow {
    session_id: String,
    user_id: String,
    status: String,
    requested_agent_type: String,
    routed_agent_type: Option<String>,
    message: String,
    chunks: String,
    response: String,
    error_message: Option<String>,
    created_at: String,
    last_updated: Option<String>,
    completed_at: Option<String>,
    ttl: i64,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            session_id: row.try_get("session_id")?,
            user_id: row.try_get("user_id")?,
            status: row.try_get("status")?,
            requested_agent_type: row.try_get("requested_agent_type")?,
            routed_agent_type: row.try_get("routed_agent_type")?,
            message: row.try_get("message")?,
            chunks: row.try_get("chunks")?,
            response: row.try_get("response")?,
            error_message: row.try_get("error_message")?,
            created_at: row.try_get("created_at")?,
            last_updated: row.try_get("last_updated")?,
            completed_at: row.try_get("completed_at")?,
            ttl: row.try_get("ttl")?,
        })
    }

    fn into_record(self) -> Result<SessionRecord, StoreError> {
        let status: SessionStatus = self.status.parse().map_err(StoreError::Query)?;
        let chunks: Vec<String> = serde_json::from_str(&self.chunks)
            .map_err(|e| StoreError::Query(format!("invalid chunks JSON: {e}")))?;

        Ok(SessionRecord {
            session_id: self.session_id,
            user_id: self.user_id,
            status,
            requested_agent_type: self.requested_agent_type,
            routed_agent_type: self.routed_agent_type,
            message: self.message,
            chunks,
            response: self.response,
            error_message: self.error_message,
            created_at: parse_datetime(&self.created_at)?,
            last_updated: self.last_updated.as_deref().map(parse_datetime).transpose()?,
            completed_at: self.completed_at.as_deref().map(parse_datetime).transpose()?,
            ttl: self.ttl,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn chunks_json(chunks: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(chunks).map_err(|e| StoreError::Query(e.to_string()))
}

// ---------------------------------------------------------------------------
// SessionStore implementation
// ---------------------------------------------------------------------------

impl SessionStore for SqliteSessionStore {
    async fn create(&self, record: &SessionRecord) -> Result<(), StoreError> {
        // A live row with the same id makes the guarded upsert a no-op.
        if self.upsert(record, true).await? == 0 {
            return Err(StoreError::DuplicateKey(record.session_id.clone()));
        }
        Ok(())
    }

    async fn replace(&self, record: &SessionRecord) -> Result<(), StoreError> {
        self.upsert(record, false).await.map(|_| ())
    }

    async fn read(&self, session_id: &str) -> Result<SessionRecord, StoreError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE session_id = ? AND ttl > ?")
            .bind(session_id)
            .bind(Utc::now().timestamp())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let row = row.ok_or(StoreError::NotFound)?;
        SessionRow::from_row(&row)
            .map_err(|e| StoreError::Query(e.to_string()))?
            .into_record()
    }

    async fn update_partial(
        &self,
        session_id: &str,
        update: &SessionUpdate,
    ) -> Result<(), StoreError> {
        if update.is_empty() {
            return self.read(session_id).await.map(|_| ());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE chat_sessions SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(status) = update.status {
                set.push("status = ").push_bind_unseparated(status.as_str());
            }
            if let Some(chunks) = &update.chunks {
                set.push("chunks = ").push_bind_unseparated(chunks_json(chunks)?);
            }
            if let Some(response) = &update.response {
                set.push("response = ").push_bind_unseparated(response.clone());
            }
            if let Some(error_message) = &update.error_message {
                set.push("error_message = ").push_bind_unseparated(error_message.clone());
            }
            if let Some(routed) = &update.routed_agent_type {
                set.push("routed_agent_type = ").push_bind_unseparated(routed.clone());
            }
            if let Some(ts) = &update.last_updated {
                set.push("last_updated = ").push_bind_unseparated(format_datetime(ts));
            }
            if let Some(ts) = &update.completed_at {
                set.push("completed_at = ").push_bind_unseparated(format_datetime(ts));
            }
        }
        qb.push(" WHERE session_id = ")
            .push_bind(session_id.to_string())
            .push(" AND status = 'processing' AND ttl > ")
            .push_bind(Utc::now().timestamp());

        let result = qb
            .build()
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(self.classify_miss(session_id).await);
        }
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM chat_sessions WHERE ttl <= ?")
            .bind(now.timestamp())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn test_store() -> SqliteSessionStore {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        SqliteSessionStore::new(DatabasePool::new(&url).await.unwrap())
    }

    fn make_record(id: &str, ttl_secs: i64) -> SessionRecord {
        SessionRecord::new_processing(id, "user-1", "supervisor", "Hello", Utc::now(), ttl_secs)
    }

    #[tokio::test]
    async fn test_create_and_read() {
        let store = test_store().await;
        store.create(&make_record("s1", 3_600)).await.unwrap();

        let found = store.read("s1").await.unwrap();
        assert_eq!(found.session_id, "s1");
        assert_eq!(found.user_id, "user-1");
        assert_eq!(found.status, SessionStatus::Processing);
        assert!(found.chunks.is_empty());
        assert!(found.last_updated.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_live_id_rejected() {
        let store = test_store().await;
        store.create(&make_record("s1", 3_600)).await.unwrap();

        let err = store.create(&make_record("s1", 3_600)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn test_expired_id_is_replaced() {
        let store = test_store().await;
        store.create(&make_record("s1", -10)).await.unwrap();
        assert!(matches!(store.read("s1").await, Err(StoreError::NotFound)));

        let mut fresh = make_record("s1", 3_600);
        fresh.message = "Second".into();
        store.create(&fresh).await.unwrap();
        assert_eq!(store.read("s1").await.unwrap().message, "Second");
    }

    #[tokio::test]
    async fn test_replace_overwrites_live_and_terminal_rows() {
        let store = test_store().await;
        store.create(&make_record("s1", 3_600)).await.unwrap();
        store
            .update_partial("s1", &SessionUpdate::completed(vec!["Hi".into()], "Hi".into(), Utc::now()))
            .await
            .unwrap();

        let mut next = make_record("s1", 3_600);
        next.message = "Follow-up".into();
        store.replace(&next).await.unwrap();

        let found = store.read("s1").await.unwrap();
        assert_eq!(found.message, "Follow-up");
        assert_eq!(found.status, SessionStatus::Processing);
        assert!(found.chunks.is_empty());
        assert!(found.response.is_empty());
        assert!(found.completed_at.is_none());

        // A replaced record accepts updates again.
        store
            .update_partial("s1", &SessionUpdate::failed("boom", Utc::now()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_replace_inserts_unknown_id() {
        let store = test_store().await;
        store.replace(&make_record("fresh", 3_600)).await.unwrap();
        assert!(store.read("fresh").await.is_ok());
    }

    #[tokio::test]
    async fn test_checkpoint_then_complete() {
        let store = test_store().await;
        store.create(&make_record("s1", 3_600)).await.unwrap();

        let chunks: Vec<String> = ["Hello", " ", "world"].iter().map(|s| s.to_string()).collect();
        store
            .update_partial("s1", &SessionUpdate::checkpoint(&chunks, "Hello world", Utc::now()))
            .await
            .unwrap();
        let mid = store.read("s1").await.unwrap();
        assert_eq!(mid.chunks, chunks);
        assert_eq!(mid.status, SessionStatus::Processing);
        assert!(mid.last_updated.is_some());

        let mut all = chunks.clone();
        all.push("!".into());
        store
            .update_partial("s1", &SessionUpdate::completed(all.clone(), all.concat(), Utc::now()))
            .await
            .unwrap();
        let done = store.read("s1").await.unwrap();
        assert_eq!(done.status, SessionStatus::Completed);
        assert_eq!(done.response, "Hello world!");
        assert_eq!(done.chunks.len(), 4);
        assert!(done.completed_at.is_some());
        assert_eq!(done.message, "Hello");
    }

    #[tokio::test]
    async fn test_terminal_record_is_frozen() {
        let store = test_store().await;
        store.create(&make_record("s1", 3_600)).await.unwrap();
        store
            .update_partial("s1", &SessionUpdate::failed("boom", Utc::now()))
            .await
            .unwrap();

        let err = store
            .update_partial(
                "s1",
                &SessionUpdate::completed(vec!["late".into()], "late".into(), Utc::now()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let record = store.read("s1").await.unwrap();
        assert_eq!(record.status, SessionStatus::Error);
        assert_eq!(record.error_message.as_deref(), Some("boom"));
        assert!(record.chunks.is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let store = test_store().await;
        let err = store
            .update_partial("missing", &SessionUpdate::failed("x", Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = test_store().await;
        store.create(&make_record("short", 10)).await.unwrap();
        store.create(&make_record("long", 3_600)).await.unwrap();

        let removed = store
            .purge_expired(Utc::now() + Duration::seconds(60))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.read("long").await.is_ok());
        assert_eq!(store.purge_expired(Utc::now()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unicode_chunks_roundtrip() {
        let store = test_store().await;
        store.create(&make_record("s1", 3_600)).await.unwrap();
        let chunks = vec!["💬 héllo".to_string(), "\"quoted\"\n".to_string()];
        store
            .update_partial("s1", &SessionUpdate::checkpoint(&chunks, &chunks.concat(), Utc::now()))
            .await
            .unwrap();
        assert_eq!(store.read("s1").await.unwrap().chunks, chunks);
    }
}
