//! Pending-write queue.
//!
//! Inspections filed without connectivity are queued locally under a
//! device-minted id and uploaded later by the reconciler. Once
//! [`enqueue`] returns, the inspection survives process restarts.

use time::OffsetDateTime;
use tracing::debug;

use firehall_store::QueuedInspection;
use firehall_types::{InspectionDraft, LOCAL_ID_PREFIX, LocalId};

use crate::SharedStore;
use crate::error::Result;

/// Mint a unique local id for a record created on this device.
///
/// The id is `local-<unix millis>-<8 hex digits>`: the timestamp keeps ids
/// roughly ordered and readable in logs, the random suffix keeps two
/// inspections filed in the same millisecond distinct.
#[must_use]
pub fn mint_local_id() -> LocalId {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix: u32 = rand::random();
    LocalId::new(format!("{LOCAL_ID_PREFIX}{millis}-{suffix:08x}"))
}

/// Queue an inspection draft for later upload.
///
/// The draft is stored verbatim under a freshly minted local id with the
/// synced flag off. Returns the queued entry, local id included, so the
/// caller can show it to the user or track it.
pub async fn enqueue(store: &SharedStore, draft: InspectionDraft) -> Result<QueuedInspection> {
    let entry = QueuedInspection::new(mint_local_id(), draft);
    store.lock().await.enqueue_pending(&entry)?;
    debug!("Queued inspection {} for upload", entry.local_id);
    Ok(entry)
}

/// Inspections still waiting for upload, oldest first.
pub async fn list_pending(store: &SharedStore) -> Result<Vec<QueuedInspection>> {
    Ok(store.lock().await.unsynced_pending()?)
}

/// Flag a queued inspection as uploaded.
///
/// Returns `true` if the call flipped the flag, `false` if the entry was
/// already synced or does not exist. The flag never goes back to unsynced.
pub async fn mark_synced(store: &SharedStore, local_id: &LocalId) -> Result<bool> {
    Ok(store.lock().await.mark_synced(local_id)?)
}
