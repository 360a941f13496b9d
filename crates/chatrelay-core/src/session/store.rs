//! SessionStore trait definition.
//!
//! Durable keyed storage for [`SessionRecord`]s. Follows the same RPITIT
//! pattern as the other repository traits in this crate.

use chatrelay_types::error::StoreError;
use chatrelay_types::session::{SessionRecord, SessionUpdate};
use chrono::{DateTime, Utc};

/// Repository trait for chat session records.
///
/// Implementations live in chatrelay-infra (e.g., `SqliteSessionStore`) plus
/// the in-process [`MemorySessionStore`](super::memory::MemorySessionStore).
///
/// Only one writer (the active relay for a session) issues updates for a given
/// id at a time, so no cross-update locking is required. Each individual
/// `update_partial` must still be atomic.
pub trait SessionStore: Send + Sync {
    /// Insert a new record.
    ///
    /// Fails with [`StoreError::DuplicateKey`] if a live record already uses
    /// the id. An expired record occupying the id is replaced.
    fn create(
        &self,
        record: &SessionRecord,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Insert `record`, overwriting whatever currently uses its id.
    ///
    /// Used when a client continues a session it already holds: the new
    /// request starts from a fresh `processing` record.
    fn replace(
        &self,
        record: &SessionRecord,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Fetch a record. Absent and expired records both yield
    /// [`StoreError::NotFound`].
    fn read(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<SessionRecord, StoreError>> + Send;

    /// Atomically apply only the named fields of `update`.
    ///
    /// The update is conditional on the record still being `processing`:
    /// terminal records yield [`StoreError::Conflict`] and are left untouched.
    fn update_partial(
        &self,
        session_id: &str,
        update: &SessionUpdate,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Delete every record whose TTL is at or before `now`.
    /// Returns how many were removed.
    fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
