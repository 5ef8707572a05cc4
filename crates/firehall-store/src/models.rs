//! Data models for stored data.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use firehall_types::{InspectionDraft, LocalId};

/// Keys used in the metadata table.
pub mod meta_keys {
    /// Unix timestamp of the last successful snapshot.
    pub const LAST_SNAPSHOT_AT: &str = "last_snapshot_at";
    /// Unix timestamp of the last reconcile pass over the pending queue.
    pub const LAST_SYNC_AT: &str = "last_sync_at";
    /// Tenant whose data currently fills the reference partitions.
    pub const ACTIVE_TENANT: &str = "active_tenant";
}

/// An inspection waiting in the pending-write queue.
///
/// The draft payload is stored verbatim; queue bookkeeping lives in the
/// other fields so the uploaded body never has to be scrubbed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedInspection {
    /// Locally minted identifier, unique on this device.
    pub local_id: LocalId,
    /// The inspection exactly as captured in the field.
    pub payload: InspectionDraft,
    /// Whether the server has accepted this record.
    pub synced: bool,
    /// When the record was enqueued.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the server accepted the record, once synced.
    #[serde(with = "time::serde::rfc3339::option")]
    pub synced_at: Option<OffsetDateTime>,
}

impl QueuedInspection {
    /// Create a fresh, unsynced queue entry timestamped now.
    pub fn new(local_id: LocalId, payload: InspectionDraft) -> Self {
        Self {
            local_id,
            payload,
            synced: false,
            created_at: OffsetDateTime::now_utc(),
            synced_at: None,
        }
    }
}
