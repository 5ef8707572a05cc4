//! Offline cache and sync queue for Firehall field operations.
//!
//! Fire crews inspect buildings in basements, stairwells, and rural
//! districts where connectivity is anything but guaranteed. This crate
//! keeps a device useful there: it caches a tenant's reference data ahead
//! of time, queues inspections written offline, and uploads them once the
//! network returns.
//!
//! # Features
//!
//! - **Snapshot loading**: Cache buildings, inspection templates, and
//!   intervention plans for one tenant in a single pass
//! - **Pending-write queue**: Save inspections under device-minted local
//!   ids; entries survive restarts
//! - **Reconciliation**: Upload queued inspections oldest-first, with
//!   per-record failure isolation
//! - **Readiness and stats**: Report whether the device can work offline
//!   and what the cache holds
//!
//! # Collections
//!
//! | Collection | Role |
//! |------------|------|
//! | Buildings | Mandatory; inspections reference them |
//! | Inspection templates | Mandatory; define the checklist |
//! | Intervention plans | Optional; skipped when unavailable |
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use firehall_offline::{MockRemote, OfflineService};
//! use firehall_store::Store;
//! use firehall_types::{InspectionDraft, TenantId};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Store::open_default()?;
//!     let remote = Arc::new(MockRemote::new());
//!     let service = OfflineService::new(store, remote);
//!     let tenant = TenantId::new("station-12");
//!
//!     // While online: cache the tenant's reference data
//!     let report = service.prepare_offline_mode(&tenant).await?;
//!     println!("Cached {} buildings", report.buildings);
//!
//!     // In the field: file an inspection with no connectivity
//!     let draft = InspectionDraft::try_from(json!({"buildingId": "b-1"}))?;
//!     let entry = service.save_inspection_offline(draft).await?;
//!     println!("Queued as {}", entry.local_id);
//!
//!     // Back online: push the queue to the server
//!     let report = service.sync_pending_inspections(&tenant).await?;
//!     println!("Uploaded {}/{}", report.synced, report.total);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod mock;
pub mod queue;
pub mod readiness;
pub mod reconcile;
pub mod remote;
pub mod service;
pub mod snapshot;

// Core exports
pub use error::{Error, Result};
pub use mock::{MockRemote, MockRemoteBuilder};
pub use queue::mint_local_id;
pub use readiness::OfflineStats;
pub use reconcile::{ReconcileReport, SyncFailure};
pub use remote::{ApiRoutes, RemoteApi, RemoteError, RemoteResult};
pub use service::OfflineService;
pub use snapshot::{CollectionLoad, SnapshotReport};

/// Type alias for a shared store handle.
///
/// The snapshot loader, the queue, and the reconciler all reach the store
/// through this handle. The mutex serializes access, so a snapshot's write
/// phase and a queue update never interleave.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use firehall_offline::SharedStore;
/// use firehall_store::Store;
/// use tokio::sync::Mutex;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store: SharedStore = Arc::new(Mutex::new(Store::open_default()?));
///
/// // Clone the Arc to share across tasks
/// let store_clone = Arc::clone(&store);
/// tokio::spawn(async move {
///     let pending = store_clone.lock().await.unsynced_pending();
///     // ...
/// });
/// # Ok(())
/// # }
/// ```
pub type SharedStore = std::sync::Arc<tokio::sync::Mutex<firehall_store::Store>>;

// Re-export from firehall-types
pub use firehall_types::{InspectionDraft, LocalId, ReferencePartition, TenantId};

// Re-export from firehall-store
pub use firehall_store::{QueuedInspection, Store};
