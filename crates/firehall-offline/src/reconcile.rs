//! Queue reconciler.
//!
//! Walks the pending queue oldest-first and uploads each inspection to the
//! backend. A record the server rejects is reported and left in the queue;
//! the pass carries on with the rest. Each record gets exactly one upload
//! attempt per pass, so a rejection cannot stall the queue behind it.

use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use firehall_types::{LocalId, TenantId};

use crate::SharedStore;
use crate::error::{Error, Result};
use crate::remote::{ApiRoutes, RemoteApi, RemoteError};

/// One record the server refused during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    /// Local id of the record still waiting in the queue.
    pub local_id: LocalId,
    /// What the server said.
    pub message: String,
}

/// Outcome of one pass over the pending queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Records uploaded and flagged synced during this pass.
    pub synced: usize,
    /// Records that were pending when the pass started.
    pub total: usize,
    /// Records the server refused, in queue order.
    pub failures: Vec<SyncFailure>,
}

impl ReconcileReport {
    /// Check if every pending record made it to the server.
    #[must_use]
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Upload every unsynced inspection for `tenant`, oldest first.
///
/// Rejections are collected in the report and the records stay queued for
/// a later pass. Local storage failures abort the pass; nothing is ever
/// dropped from the queue on an error.
pub async fn reconcile(
    store: &SharedStore,
    remote: &Arc<dyn RemoteApi>,
    tenant: &TenantId,
    routes: &ApiRoutes,
) -> Result<ReconcileReport> {
    let pending = store.lock().await.unsynced_pending()?;
    if pending.is_empty() {
        debug!("Pending queue is empty, nothing to sync");
        return Ok(ReconcileReport::default());
    }

    let total = pending.len();
    info!("Syncing {} pending inspections for tenant {}", total, tenant);

    let mut synced = 0usize;
    let mut failures = Vec::new();

    for entry in pending {
        let task_store = Arc::clone(store);
        let task_remote = Arc::clone(remote);
        let task_tenant = tenant.clone();
        let path = routes.inspections.clone();
        let local_id = entry.local_id.clone();
        let body = entry.payload.to_value();

        // Each upload runs in its own task. If the caller drops this future
        // mid-pass, a record the server already accepted still gets its
        // synced flag, so the next pass will not upload it again.
        let upload = tokio::spawn(async move {
            match task_remote.create_record(&task_tenant, &path, body).await {
                Ok(_) => {
                    task_store.lock().await.mark_synced(&local_id)?;
                    Ok(None)
                }
                Err(err) => Ok(Some(err)),
            }
        });

        match upload.await {
            Ok(Ok(None)) => synced += 1,
            Ok(Ok(Some(rejection))) => {
                warn!(
                    "Inspection {} failed to sync: {}",
                    entry.local_id, rejection
                );
                failures.push(SyncFailure {
                    local_id: entry.local_id,
                    message: rejection_message(&rejection),
                });
            }
            Ok(Err(storage)) => return Err(Error::Store(storage)),
            Err(join_err) => {
                warn!(
                    "Sync task for {} did not finish: {}",
                    entry.local_id, join_err
                );
                failures.push(SyncFailure {
                    local_id: entry.local_id,
                    message: format!("Sync task did not finish: {join_err}"),
                });
            }
        }
    }

    store
        .lock()
        .await
        .set_last_sync_at(OffsetDateTime::now_utc())?;

    if failures.is_empty() {
        info!("Sync complete: {}/{} inspections uploaded", synced, total);
    } else {
        warn!(
            "Sync finished with {} failures ({}/{} uploaded)",
            failures.len(),
            synced,
            total
        );
    }

    Ok(ReconcileReport {
        synced,
        total,
        failures,
    })
}

fn rejection_message(err: &RemoteError) -> String {
    match err {
        RemoteError::Rejected { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
