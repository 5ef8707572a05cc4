//! Readiness and cache statistics.
//!
//! A device is offline-ready for a tenant only when a snapshot for that
//! tenant has completed and both mandatory partitions actually hold
//! records. Intervention plans do not gate readiness.

use serde::Serialize;
use time::OffsetDateTime;

use firehall_types::{ReferencePartition, TenantId};

use crate::SharedStore;
use crate::error::Result;

/// Counts and timestamps describing the cache, for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfflineStats {
    /// Buildings cached.
    pub buildings: u64,
    /// Inspection templates cached.
    pub inspection_templates: u64,
    /// Intervention plans cached.
    pub intervention_plans: u64,
    /// Inspections queued and not yet uploaded.
    pub pending_unsynced: u64,
    /// When the last snapshot completed, if ever.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_snapshot_at: Option<OffsetDateTime>,
    /// When the queue was last reconciled, if ever.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_sync_at: Option<OffsetDateTime>,
    /// Tenant the cached reference data belongs to.
    pub active_tenant: Option<TenantId>,
}

/// Check whether the cache can support offline work for `tenant`.
///
/// Requires a completed snapshot, cached data belonging to this tenant
/// rather than a previously signed-in one, and at least one building and
/// one inspection template.
pub async fn is_ready(store: &SharedStore, tenant: &TenantId) -> Result<bool> {
    let store = store.lock().await;

    if store.last_snapshot_at()?.is_none() {
        return Ok(false);
    }
    if store.active_tenant()?.as_ref() != Some(tenant) {
        return Ok(false);
    }

    // Metadata alone is not enough; an empty mandatory partition cannot
    // drive an inspection.
    Ok(store.count(ReferencePartition::Buildings)? > 0
        && store.count(ReferencePartition::InspectionTemplates)? > 0)
}

/// Gather cache counts and timestamps.
pub async fn stats(store: &SharedStore) -> Result<OfflineStats> {
    let store = store.lock().await;

    Ok(OfflineStats {
        buildings: store.count(ReferencePartition::Buildings)?,
        inspection_templates: store.count(ReferencePartition::InspectionTemplates)?,
        intervention_plans: store.count(ReferencePartition::InterventionPlans)?,
        pending_unsynced: store.count_unsynced()?,
        last_snapshot_at: store.last_snapshot_at()?,
        last_sync_at: store.last_sync_at()?,
        active_tenant: store.active_tenant()?,
    })
}
