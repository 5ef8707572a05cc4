//! High-level offline facade.
//!
//! [`OfflineService`] ties the store, the remote API, and the route table
//! together behind the handful of calls an application actually makes:
//! prepare the cache, save work offline, sync it back, and report status.

use std::sync::Arc;

use tokio::sync::Mutex;

use firehall_store::{QueuedInspection, Store};
use firehall_types::{InspectionDraft, TenantId};

use crate::SharedStore;
use crate::error::Result;
use crate::queue;
use crate::readiness::{self, OfflineStats};
use crate::reconcile::{self, ReconcileReport};
use crate::remote::{ApiRoutes, RemoteApi};
use crate::snapshot::{self, SnapshotReport};

/// Entry point for offline operation.
///
/// Owns a shared handle to the local store and a remote API client. All
/// methods take `&self`; the service can be cloned cheaply or wrapped in
/// an `Arc` and used from several tasks at once.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use firehall_offline::{MockRemote, OfflineService};
/// use firehall_store::Store;
/// use firehall_types::TenantId;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = Store::open_default()?;
///     let remote = Arc::new(MockRemote::new());
///     let service = OfflineService::new(store, remote);
///
///     let tenant = TenantId::new("station-12");
///     let report = service.prepare_offline_mode(&tenant).await?;
///     println!("Cached {} buildings", report.buildings);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct OfflineService {
    store: SharedStore,
    remote: Arc<dyn RemoteApi>,
    routes: ApiRoutes,
}

impl OfflineService {
    /// Create a service over an owned store.
    pub fn new(store: Store, remote: Arc<dyn RemoteApi>) -> Self {
        Self::from_shared(Arc::new(Mutex::new(store)), remote)
    }

    /// Create a service over a store handle shared with other components.
    pub fn from_shared(store: SharedStore, remote: Arc<dyn RemoteApi>) -> Self {
        Self {
            store,
            remote,
            routes: ApiRoutes::default(),
        }
    }

    /// Replace the default server routes.
    #[must_use]
    pub fn with_routes(mut self, routes: ApiRoutes) -> Self {
        self.routes = routes;
        self
    }

    /// Shared handle to the underlying store.
    #[must_use]
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    // --- Snapshot ---

    /// Download the tenant's reference data and cache it for offline use.
    ///
    /// See [`snapshot::load_snapshot`] for the exact guarantees around
    /// mandatory and optional collections.
    pub async fn prepare_offline_mode(&self, tenant: &TenantId) -> Result<SnapshotReport> {
        snapshot::load_snapshot(&self.store, self.remote.as_ref(), tenant, &self.routes).await
    }

    // --- Pending queue ---

    /// Queue an inspection for upload and return the stored entry.
    ///
    /// Works with or without connectivity; the draft is on disk once this
    /// returns.
    pub async fn save_inspection_offline(&self, draft: InspectionDraft) -> Result<QueuedInspection> {
        queue::enqueue(&self.store, draft).await
    }

    /// Inspections saved on this device and not yet uploaded.
    pub async fn pending_inspections(&self) -> Result<Vec<QueuedInspection>> {
        queue::list_pending(&self.store).await
    }

    /// Upload pending inspections to the server, oldest first.
    pub async fn sync_pending_inspections(&self, tenant: &TenantId) -> Result<ReconcileReport> {
        reconcile::reconcile(&self.store, &self.remote, tenant, &self.routes).await
    }

    /// Drop queue entries that have already been uploaded.
    ///
    /// Returns how many entries were removed.
    pub async fn clear_synced_inspections(&self) -> Result<usize> {
        Ok(self.store.lock().await.purge_synced()?)
    }

    // --- Status ---

    /// Check whether this device can work offline for `tenant`.
    pub async fn is_offline_ready(&self, tenant: &TenantId) -> Result<bool> {
        readiness::is_ready(&self.store, tenant).await
    }

    /// Cache counts and timestamps for status displays.
    pub async fn offline_stats(&self) -> Result<OfflineStats> {
        readiness::stats(&self.store).await
    }
}

impl std::fmt::Debug for OfflineService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineService")
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}
