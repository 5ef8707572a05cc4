//! Snapshot loader.
//!
//! Pulls the reference collections a crew needs in the field (buildings,
//! inspection templates, intervention plans) from the backend and caches
//! them locally, replacing whatever the cache held before.
//!
//! Buildings and inspection templates are mandatory: if either cannot be
//! fetched and decoded, the snapshot fails and the previous cache survives
//! untouched. Intervention plans are optional; a failure there skips the
//! collection and empties its partition so stale plans cannot linger.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{info, warn};

use firehall_types::{
    Building, InspectionTemplate, InterventionPlan, ReferencePartition, ReferenceRecord, TenantId,
};

use crate::SharedStore;
use crate::error::{Error, Result};
use crate::remote::{ApiRoutes, RemoteApi};

/// Outcome for one optional collection in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionLoad {
    /// The collection was fetched and cached; carries the record count.
    Loaded(usize),
    /// The collection was skipped and its partition emptied.
    Skipped {
        /// Operator-facing reason, taken from the underlying failure.
        reason: String,
    },
}

impl CollectionLoad {
    /// Number of records cached for this collection.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Loaded(count) => *count,
            Self::Skipped { .. } => 0,
        }
    }

    /// Check if the collection made it into the cache.
    #[must_use]
    pub fn was_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Summary of a completed snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotReport {
    /// Buildings cached.
    pub buildings: usize,
    /// Inspection templates cached.
    pub inspection_templates: usize,
    /// How the optional intervention plans collection fared.
    pub intervention_plans: CollectionLoad,
    /// When the snapshot was taken.
    #[serde(with = "time::serde::rfc3339")]
    pub taken_at: OffsetDateTime,
}

/// Fetch all reference collections for `tenant` and replace the cache.
///
/// Both mandatory collections are fetched and decoded before the store is
/// touched, so a failed snapshot never leaves the cache half-replaced.
/// Running the same snapshot twice yields the same cache contents.
pub async fn load_snapshot(
    store: &SharedStore,
    remote: &dyn RemoteApi,
    tenant: &TenantId,
    routes: &ApiRoutes,
) -> Result<SnapshotReport> {
    info!("Loading offline snapshot for tenant {}", tenant);

    let buildings: Vec<Building> = fetch_partition(remote, tenant, &routes.buildings).await?;
    let templates: Vec<InspectionTemplate> =
        fetch_partition(remote, tenant, &routes.inspection_templates).await?;

    let plans: std::result::Result<Vec<InterventionPlan>, String> =
        match fetch_partition(remote, tenant, &routes.intervention_plans).await {
            Ok(records) => Ok(records),
            Err(err) => {
                let reason = skip_reason(&err);
                warn!("Skipping intervention plans: {}", reason);
                Err(reason)
            }
        };

    let taken_at = OffsetDateTime::now_utc();

    // Single write phase under the store lock. Crews reading mid-snapshot
    // see either the previous cache or the new one, not a mix.
    let mut store = store.lock().await;
    let buildings_count = store.replace_all(&buildings)?;
    let templates_count = store.replace_all(&templates)?;
    let plans_load = match plans {
        Ok(records) => CollectionLoad::Loaded(store.replace_all(&records)?),
        Err(reason) => {
            // Plans from an earlier snapshot must not outlive a skip.
            store.clear(ReferencePartition::InterventionPlans)?;
            CollectionLoad::Skipped { reason }
        }
    };
    store.set_last_snapshot_at(taken_at)?;
    store.set_active_tenant(tenant)?;

    info!(
        "Snapshot complete: {} buildings, {} templates, {} plans",
        buildings_count,
        templates_count,
        plans_load.count()
    );

    Ok(SnapshotReport {
        buildings: buildings_count,
        inspection_templates: templates_count,
        intervention_plans: plans_load,
        taken_at,
    })
}

/// Fetch one collection and decode every record into `R`.
async fn fetch_partition<R>(remote: &dyn RemoteApi, tenant: &TenantId, path: &str) -> Result<Vec<R>>
where
    R: ReferenceRecord + DeserializeOwned,
{
    let raw: Vec<Value> = remote
        .fetch_collection(tenant, path)
        .await
        .map_err(|source| Error::SnapshotFetch {
            collection: R::PARTITION,
            source,
        })?;

    raw.into_iter()
        .map(|value| {
            serde_json::from_value(value).map_err(|source| Error::SnapshotDecode {
                collection: R::PARTITION,
                source,
            })
        })
        .collect()
}

fn skip_reason(err: &Error) -> String {
    match err {
        Error::SnapshotFetch { source, .. } => source.to_string(),
        Error::SnapshotDecode { source, .. } => format!("Malformed record: {source}"),
        other => other.to_string(),
    }
}
