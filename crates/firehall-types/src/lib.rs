//! Shared record types for the Firehall offline cache.
//!
//! This crate provides the domain types used by both the storage layer
//! (firehall-store) and the sync orchestration layer (firehall-offline).
//!
//! # Features
//!
//! - Tenant and local-record identifiers
//! - Reference record types cached for offline use (buildings, inspection
//!   templates, intervention plans) with unknown-field preservation
//! - Opaque inspection draft payloads
//! - The partition enum binding each record type to its cache partition
//!
//! # Example
//!
//! ```
//! use firehall_types::{Building, ReferencePartition, ReferenceRecord, TenantId};
//!
//! let tenant = TenantId::new("dept-42");
//! assert_eq!(Building::PARTITION, ReferencePartition::Buildings);
//! # let _ = tenant;
//! ```

pub mod error;
pub mod records;
pub mod types;

pub use error::{RecordError, RecordResult};
pub use records::{
    Building, InspectionDraft, InspectionTemplate, InterventionPlan, ReferencePartition,
    ReferenceRecord,
};
pub use types::{LOCAL_ID_PREFIX, LocalId, TenantId};
