//! Example: Offline Inspection Workflow
//!
//! This example walks the full offline cycle against the bundled mock
//! backend: snapshot the reference data, file inspections while the
//! network is down, then sync the queue once connectivity returns.
//!
//! Run with: `cargo run --example offline_workflow`

use std::sync::Arc;

use firehall_offline::{MockRemote, OfflineService};
use firehall_store::Store;
use firehall_types::{InspectionDraft, TenantId};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let tenant = TenantId::new("station-12");

    // A mock backend with a little canned reference data
    let remote = Arc::new(MockRemote::new());
    remote
        .set_collection(
            "buildings",
            vec![
                json!({"id": "b-1", "name": "Town Hall", "address": "1 Main St"}),
                json!({"id": "b-2", "name": "High School", "address": "12 School Rd"}),
            ],
        )
        .await;
    remote
        .set_collection(
            "inspection-templates",
            vec![json!({"id": "t-1", "name": "Annual fire inspection"})],
        )
        .await;
    remote
        .set_collection(
            "intervention-plans",
            vec![json!({"id": "p-1", "buildingId": "b-1"})],
        )
        .await;

    let service = OfflineService::new(Store::open_in_memory()?, remote.clone());

    // Still online: pull the snapshot
    println!("Preparing offline mode for {}...", tenant);
    let report = service.prepare_offline_mode(&tenant).await?;
    println!("  Buildings:          {}", report.buildings);
    println!("  Templates:          {}", report.inspection_templates);
    println!("  Intervention plans: {}", report.intervention_plans.count());
    println!();
    println!(
        "Offline ready: {}",
        service.is_offline_ready(&tenant).await?
    );
    println!();

    // In the field: no connectivity, inspections go to the queue
    remote
        .set_should_fail_creates(true, Some("no coverage in the basement"))
        .await;

    let first = service
        .save_inspection_offline(InspectionDraft::try_from(json!({
            "buildingId": "b-1",
            "templateId": "t-1",
            "status": "completed"
        }))?)
        .await?;
    println!("Saved {} while offline", first.local_id);

    let second = service
        .save_inspection_offline(InspectionDraft::try_from(json!({
            "buildingId": "b-2",
            "templateId": "t-1",
            "status": "completed"
        }))?)
        .await?;
    println!("Saved {} while offline", second.local_id);
    println!();

    // A sync attempt in the dead zone gets nowhere, but loses nothing
    let report = service.sync_pending_inspections(&tenant).await?;
    println!(
        "Sync in the dead zone: {}/{} uploaded, {} still queued",
        report.synced,
        report.total,
        service.pending_inspections().await?.len()
    );
    println!();

    // Back at the station: connectivity restored
    remote.set_should_fail_creates(false, None).await;

    let report = service.sync_pending_inspections(&tenant).await?;
    println!(
        "Sync at the station: {}/{} uploaded",
        report.synced, report.total
    );
    for failure in &report.failures {
        println!("  {} rejected: {}", failure.local_id, failure.message);
    }
    println!();

    let stats = service.offline_stats().await?;
    println!("Cache stats:");
    println!("  Buildings:        {}", stats.buildings);
    println!("  Templates:        {}", stats.inspection_templates);
    println!("  Plans:            {}", stats.intervention_plans);
    println!("  Pending unsynced: {}", stats.pending_unsynced);

    let purged = service.clear_synced_inspections().await?;
    println!();
    println!("Purged {} synced entries from the queue.", purged);

    Ok(())
}
