//! Local persistence for Firehall offline data.
//!
//! This crate provides SQLite-based storage for the offline cache:
//! reference records snapshotted from the server, inspections captured in
//! the field while disconnected, and the bookkeeping metadata the sync
//! layer needs.
//!
//! # Features
//!
//! - Partitioned reference cache (buildings, inspection templates,
//!   intervention plans) with whole-partition atomic replacement
//! - Durable pending-inspection queue with a monotonic synced flag
//! - Snapshot/sync metadata (timestamps, active tenant)
//! - Corruption detection on open, with a destructive reset as recovery
//!
//! # Example
//!
//! ```no_run
//! use firehall_store::Store;
//! use firehall_types::{Building, ReferencePartition};
//!
//! let store = Store::open_default()?;
//! let buildings: Vec<Building> = store.get_all()?;
//! let plans = store.count(ReferencePartition::InterventionPlans)?;
//! let waiting = store.count_unsynced()?;
//! # let _ = (buildings, plans, waiting);
//! # Ok::<(), firehall_store::Error>(())
//! ```

mod error;
mod models;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::{QueuedInspection, meta_keys};
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/firehall/offline.db`
/// - macOS: `~/Library/Application Support/firehall/offline.db`
/// - Windows: `C:\Users\<user>\AppData\Local\firehall\offline.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("firehall")
        .join("offline.db")
}
