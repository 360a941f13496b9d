//! Connection pools for the session database.
//!
//! Status polling is read-heavy while every relay funnels its checkpoints
//! through one writer. `DatabasePool` keeps the two apart: pollers share a
//! read-only pool and all `chat_sessions`/`users` mutations go through a
//! single writer connection, so SQLite never sees competing writers.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Read-only connections handed to status pollers and login lookups.
const READER_CONNECTIONS: u32 = 8;

/// Reader and writer pools over one SQLite file in WAL mode.
#[derive(Clone)]
pub struct DatabasePool {
    /// Serves `read` and credential lookups.
    pub reader: SqlitePool,
    /// Serves `create`, `replace`, `update_partial` and purges.
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Connect to `database_url` and bring the schema up to date.
    ///
    /// The writer connects and applies `migrations/` first. The reader pool
    /// is opened read-only afterwards, so it always sees both tables.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        tracing::debug!("session database ready");
        Ok(Self { reader, writer })
    }

    /// Open (creating if needed) `chatrelay.db` inside `data_dir`.
    pub async fn open(data_dir: &Path) -> Result<Self, sqlx::Error> {
        tokio::fs::create_dir_all(data_dir).await.map_err(sqlx::Error::Io)?;
        let url = crate::config::database_url(data_dir);
        tracing::debug!(url = %url, "opening session database");
        Self::new(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn fresh_pool() -> (tempfile::TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open(dir.path()).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn open_creates_nested_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("relay").join("state");
        DatabasePool::open(&nested).await.unwrap();
        assert!(nested.join("chatrelay.db").exists());
    }

    #[tokio::test]
    async fn migrations_create_session_and_user_tables() {
        let (_dir, pool) = fresh_pool().await;

        let columns: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM pragma_table_info('chat_sessions')")
                .fetch_all(&pool.reader)
                .await
                .unwrap();
        let columns: Vec<&str> = columns.iter().map(|c| c.0.as_str()).collect();
        for expected in ["session_id", "status", "chunks", "response", "ttl"] {
            assert!(columns.contains(&expected), "chat_sessions.{expected} missing");
        }

        let users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(users.0, 0);
    }

    #[tokio::test]
    async fn reopening_existing_database_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open(dir.path()).await.unwrap();
        sqlx::query(
            "INSERT INTO chat_sessions (session_id, user_id, message, created_at, ttl)
             VALUES ('s1', 'u1', 'Hello', '2026-01-01T00:00:00Z', 4102444800)",
        )
        .execute(&pool.writer)
        .await
        .unwrap();
        drop(pool);

        let pool = DatabasePool::open(dir.path()).await.unwrap();
        let row: (String, String) =
            sqlx::query_as("SELECT status, chunks FROM chat_sessions WHERE session_id = 's1'")
                .fetch_one(&pool.reader)
                .await
                .unwrap();
        assert_eq!(row, ("processing".to_string(), "[]".to_string()));
    }

    #[tokio::test]
    async fn writer_runs_in_wal_mode() {
        let (_dir, pool) = fresh_pool().await;
        let mode: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(mode.0.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn reader_cannot_write_sessions() {
        let (_dir, pool) = fresh_pool().await;
        let result = sqlx::query("DELETE FROM chat_sessions")
            .execute(&pool.reader)
            .await;
        assert!(result.is_err(), "reader pool must be read-only");
    }

    #[tokio::test]
    async fn unknown_session_status_is_rejected() {
        let (_dir, pool) = fresh_pool().await;
        let result = sqlx::query(
            "INSERT INTO chat_sessions (session_id, user_id, status, message, created_at, ttl)
             VALUES ('s1', 'u1', 'crashed', 'hi', '2026-01-01T00:00:00Z', 0)",
        )
        .execute(&pool.writer)
        .await;
        assert!(result.is_err(), "status outside processing/completed/error must be rejected");
    }

    #[tokio::test]
    async fn duplicate_user_email_is_rejected() {
        let (_dir, pool) = fresh_pool().await;
        let insert = |id: &'static str| {
            sqlx::query(
                "INSERT INTO users (user_id, email, name, password_hash, created_at, updated_at)
                 VALUES (?, 'ada@example.com', 'Ada', 'x', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
            )
            .bind(id)
        };
        insert("u1").execute(&pool.writer).await.unwrap();
        assert!(insert("u2").execute(&pool.writer).await.is_err());
    }
}
