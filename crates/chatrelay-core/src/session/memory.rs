//! In-process session store backed by `DashMap`.
//!
//! Records are cloned on read so no `DashMap` guard is ever held across an
//! `.await`. Each mutation happens under the shard lock of its entry, which
//! makes `update_partial` atomic with respect to other callers.

use std::sync::Arc;

use chatrelay_types::error::StoreError;
use chatrelay_types::session::{SessionRecord, SessionUpdate};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::store::SessionStore;

/// Concurrent in-memory implementation of [`SessionStore`].
///
/// Cloning produces a shared view of the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<DashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held, expired or not.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    async fn create(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let now = Utc::now();
        match self.inner.entry(record.session_id.clone()) {
            Entry::Occupied(mut existing) => {
                if !existing.get().is_expired(now) {
                    return Err(StoreError::DuplicateKey(record.session_id.clone()));
                }
                existing.insert(record.clone());
            }
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
            }
        }
        Ok(())
    }

    async fn replace(&self, record: &SessionRecord) -> Result<(), StoreError> {
        self.inner.insert(record.session_id.clone(), record.clone());
        Ok(())
    }

    async fn read(&self, session_id: &str) -> Result<SessionRecord, StoreError> {
        let now = Utc::now();
        self.inner
            .get(session_id)
            .map(|r| r.value().clone())
            .filter(|record| !record.is_expired(now))
            .ok_or(StoreError::NotFound)
    }

    async fn update_partial(
        &self,
        session_id: &str,
        update: &SessionUpdate,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut entry = self.inner.get_mut(session_id).ok_or(StoreError::NotFound)?;
        let record = entry.value_mut();
        if record.is_expired(now) {
            return Err(StoreError::NotFound);
        }
        if record.status.is_terminal() {
            return Err(StoreError::Conflict(format!(
                "session '{session_id}' is already {}",
                record.status
            )));
        }
        record.apply(update);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let before = self.inner.len();
        self.inner.retain(|_, record| !record.is_expired(now));
        Ok(before.saturating_sub(self.inner.len()) as u64)
    }
}
