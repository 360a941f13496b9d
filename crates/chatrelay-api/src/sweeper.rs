//! Expired-session reclamation.
//!
//! Reads already hide expired records; the sweeper deletes them so the
//! database does not grow without bound. `serve` runs it on an interval,
//! `chatrelay purge` runs a single pass.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use chatrelay_core::session::store::SessionStore;
use chatrelay_observe::relay_attrs::SPAN_PURGE;
use chatrelay_types::error::StoreError;

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Delete every expired session once and return how many were removed.
pub async fn purge_once<S: SessionStore>(store: &S) -> Result<u64, StoreError> {
    let removed = store
        .purge_expired(Utc::now())
        .instrument(tracing::debug_span!(SPAN_PURGE))
        .await?;

    if removed > 0 {
        tracing::info!(removed, "purged expired sessions");
    } else {
        tracing::debug!("no expired sessions to purge");
    }
    Ok(removed)
}

/// Run [`purge_once`] every `every` until `cancel` fires.
///
/// The first pass runs immediately. Failures are logged and the loop
/// continues with the next tick.
pub fn spawn<S>(store: Arc<S>, every: Duration, cancel: CancellationToken) -> JoinHandle<()>
where
    S: SessionStore + 'static,
{
    let every = every.max(MIN_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = purge_once(store.as_ref()).await {
                        tracing::warn!(error = %e, "session purge failed");
                    }
                }
            }
        }
        tracing::debug!("session sweeper stopped");
    })
}
