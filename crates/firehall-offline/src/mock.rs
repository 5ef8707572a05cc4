//! Mock remote API for testing.
//!
//! This module provides an in-memory backend so the snapshot loader and
//! reconciler can be tested without a server.
//!
//! The [`MockRemote`] implements the [`RemoteApi`] trait, allowing it to be
//! used interchangeably with a real API client in generic code.
//!
//! # Features
//!
//! - **Canned collections**: Serve fixed reference data per route
//! - **Failure injection**: Fail fetches per route, or uploads across the board
//! - **Targeted rejection**: Refuse uploads whose body matches a field value
//! - **Latency simulation**: Add artificial delays to fetches and uploads

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use firehall_types::TenantId;

use crate::remote::{RemoteApi, RemoteError, RemoteResult};

/// A mock backend for testing.
///
/// Canned data is keyed by route alone; the tenant is accepted and
/// ignored. Routes with no canned data serve an empty collection.
///
/// # Example
///
/// ```
/// use firehall_offline::MockRemote;
/// use firehall_types::TenantId;
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() {
///     let remote = MockRemote::new();
///     remote
///         .set_collection("buildings", vec![json!({"id": "b-1"})])
///         .await;
///
///     let tenant = TenantId::new("station-12");
///     let records = remote.fetch_collection(&tenant, "buildings").await.unwrap();
///     assert_eq!(records.len(), 1);
/// }
/// ```
pub struct MockRemote {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    /// Uploads accepted so far, as `(route, request body)` in arrival order.
    created: RwLock<Vec<(String, Value)>>,
    failed_fetches: RwLock<HashMap<String, String>>,
    rejection: RwLock<Option<Rejection>>,
    should_fail_creates: AtomicBool,
    fail_message: RwLock<String>,
    fetch_count: AtomicU32,
    create_count: AtomicU32,
    /// Simulated fetch latency in milliseconds (0 = no delay).
    fetch_latency_ms: AtomicU64,
    /// Simulated upload latency in milliseconds (0 = no delay).
    create_latency_ms: AtomicU64,
    /// Number of uploads to fail before succeeding (0 = behave normally).
    fail_count: AtomicU32,
    /// Current count of failures (decremented on each failure).
    remaining_failures: AtomicU32,
}

#[derive(Debug, Clone)]
struct Rejection {
    field: String,
    value: Value,
    message: String,
}

impl std::fmt::Debug for MockRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRemote")
            .field("fetch_count", &self.fetch_count.load(Ordering::Relaxed))
            .field("create_count", &self.create_count.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemote {
    /// Create a mock with no canned data.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            created: RwLock::new(Vec::new()),
            failed_fetches: RwLock::new(HashMap::new()),
            rejection: RwLock::new(None),
            should_fail_creates: AtomicBool::new(false),
            fail_message: RwLock::new("Mock network failure".to_string()),
            fetch_count: AtomicU32::new(0),
            create_count: AtomicU32::new(0),
            fetch_latency_ms: AtomicU64::new(0),
            create_latency_ms: AtomicU64::new(0),
            fail_count: AtomicU32::new(0),
            remaining_failures: AtomicU32::new(0),
        }
    }

    /// Fetch a canned collection.
    pub async fn fetch_collection(
        &self,
        _tenant: &TenantId,
        path: &str,
    ) -> RemoteResult<Vec<Value>> {
        self.simulate_latency(&self.fetch_latency_ms).await;
        self.fetch_count.fetch_add(1, Ordering::Relaxed);

        if let Some(message) = self.failed_fetches.read().await.get(path) {
            return Err(RemoteError::Network(message.clone()));
        }

        Ok(self
            .collections
            .read()
            .await
            .get(path)
            .cloned()
            .unwrap_or_default())
    }

    /// Accept an upload, assign a server id, and log it.
    pub async fn create_record(
        &self,
        _tenant: &TenantId,
        path: &str,
        body: Value,
    ) -> RemoteResult<Value> {
        self.simulate_latency(&self.create_latency_ms).await;
        let serial = self.create_count.fetch_add(1, Ordering::Relaxed) + 1;

        // Check for transient failures first
        if self.remaining_failures.load(Ordering::Relaxed) > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(RemoteError::Network(self.fail_message.read().await.clone()));
        }

        if self.should_fail_creates.load(Ordering::Relaxed) {
            return Err(RemoteError::Network(self.fail_message.read().await.clone()));
        }

        if let Some(rejection) = self.rejection.read().await.as_ref() {
            if body.get(&rejection.field) == Some(&rejection.value) {
                return Err(RemoteError::Rejected {
                    status: 422,
                    message: rejection.message.clone(),
                });
            }
        }

        self.created
            .write()
            .await
            .push((path.to_string(), body.clone()));

        let mut stored = body;
        if let Value::Object(ref mut map) = stored {
            map.insert("id".to_string(), Value::String(format!("srv-{serial:06}")));
        }
        Ok(stored)
    }

    async fn simulate_latency(&self, latency_ms: &AtomicU64) {
        let latency = latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
    }

    // --- Test control methods ---

    /// Replace the canned data behind a route.
    pub async fn set_collection(&self, path: &str, records: Vec<Value>) {
        self.collections
            .write()
            .await
            .insert(path.to_string(), records);
    }

    /// Make fetches of `path` fail with a network error.
    pub async fn fail_collection(&self, path: &str, message: &str) {
        self.failed_fetches
            .write()
            .await
            .insert(path.to_string(), message.to_string());
    }

    /// Let fetches of `path` succeed again.
    pub async fn clear_collection_failure(&self, path: &str) {
        self.failed_fetches.write().await.remove(path);
    }

    /// Make every upload fail with a network error.
    pub async fn set_should_fail_creates(&self, fail: bool, message: Option<&str>) {
        self.should_fail_creates.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *self.fail_message.write().await = msg.to_string();
        }
    }

    /// Reject uploads whose body carries `value` under `field`.
    ///
    /// The rejection is a permanent 422, not a network error; other
    /// uploads go through untouched.
    pub async fn reject_matching(&self, field: &str, value: Value, message: &str) {
        *self.rejection.write().await = Some(Rejection {
            field: field.to_string(),
            value,
            message: message.to_string(),
        });
    }

    /// Accept previously rejected uploads again.
    pub async fn clear_rejection(&self) {
        *self.rejection.write().await = None;
    }

    /// Configure transient upload failures.
    ///
    /// The next `count` uploads will fail with a network error, then
    /// succeed. This is useful for testing that queued records survive an
    /// outage and sync on a later pass.
    pub fn set_transient_create_failures(&self, count: u32) {
        self.fail_count.store(count, Ordering::Relaxed);
        self.remaining_failures.store(count, Ordering::Relaxed);
    }

    /// Reset the transient failure counter.
    pub fn reset_transient_failures(&self) {
        self.remaining_failures
            .store(self.fail_count.load(Ordering::Relaxed), Ordering::Relaxed);
    }

    /// Get the number of remaining transient failures.
    pub fn remaining_failures(&self) -> u32 {
        self.remaining_failures.load(Ordering::Relaxed)
    }

    /// Set simulated fetch latency.
    ///
    /// Each fetch will be delayed by this duration. Set to
    /// `Duration::ZERO` to disable latency simulation.
    pub fn set_fetch_latency(&self, latency: Duration) {
        self.fetch_latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Set simulated upload latency.
    ///
    /// Each upload will be delayed by this duration. Set to
    /// `Duration::ZERO` to disable latency simulation.
    pub fn set_create_latency(&self, latency: Duration) {
        self.create_latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Get the number of fetches performed.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    /// Get the number of uploads attempted, failed ones included.
    pub fn create_count(&self) -> u32 {
        self.create_count.load(Ordering::Relaxed)
    }

    /// Reset the fetch and upload counters.
    pub fn reset_counts(&self) {
        self.fetch_count.store(0, Ordering::Relaxed);
        self.create_count.store(0, Ordering::Relaxed);
    }

    /// Uploads accepted so far, as `(route, request body)` pairs in
    /// arrival order. Rejected and failed uploads are not logged.
    pub async fn created_records(&self) -> Vec<(String, Value)> {
        self.created.read().await.clone()
    }
}

// Implement the RemoteApi trait for MockRemote
#[async_trait]
impl RemoteApi for MockRemote {
    // --- Reference data ---

    async fn fetch_collection(&self, tenant: &TenantId, path: &str) -> RemoteResult<Vec<Value>> {
        MockRemote::fetch_collection(self, tenant, path).await
    }

    // --- Uploads ---

    async fn create_record(
        &self,
        tenant: &TenantId,
        path: &str,
        body: Value,
    ) -> RemoteResult<Value> {
        MockRemote::create_record(self, tenant, path, body).await
    }
}

/// Builder for creating mocks with canned data in place.
#[derive(Debug, Default)]
pub struct MockRemoteBuilder {
    collections: HashMap<String, Vec<Value>>,
    fetch_latency: Option<Duration>,
    create_latency: Option<Duration>,
}

impl MockRemoteBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` under `path`.
    #[must_use]
    pub fn collection(mut self, path: &str, records: Vec<Value>) -> Self {
        self.collections.insert(path.to_string(), records);
        self
    }

    /// Delay every fetch by `latency`.
    #[must_use]
    pub fn fetch_latency(mut self, latency: Duration) -> Self {
        self.fetch_latency = Some(latency);
        self
    }

    /// Delay every upload by `latency`.
    #[must_use]
    pub fn create_latency(mut self, latency: Duration) -> Self {
        self.create_latency = Some(latency);
        self
    }

    /// Build the mock.
    #[must_use]
    pub fn build(self) -> MockRemote {
        let remote = MockRemote {
            collections: RwLock::new(self.collections),
            created: RwLock::new(Vec::new()),
            failed_fetches: RwLock::new(HashMap::new()),
            rejection: RwLock::new(None),
            should_fail_creates: AtomicBool::new(false),
            fail_message: RwLock::new("Mock network failure".to_string()),
            fetch_count: AtomicU32::new(0),
            create_count: AtomicU32::new(0),
            fetch_latency_ms: AtomicU64::new(0),
            create_latency_ms: AtomicU64::new(0),
            fail_count: AtomicU32::new(0),
            remaining_failures: AtomicU32::new(0),
        };
        if let Some(latency) = self.fetch_latency {
            remote.set_fetch_latency(latency);
        }
        if let Some(latency) = self.create_latency {
            remote.set_create_latency(latency);
        }
        remote
    }
}

/// Unit tests for MockRemote and MockRemoteBuilder.
///
/// These tests verify the mock backend used to exercise the snapshot
/// loader and reconciler without a server.
///
/// # Test Categories
///
/// ## Fetch Tests
/// - `test_fetch_canned_collection`: Canned data comes back verbatim
/// - `test_fetch_unknown_path_is_empty`: Unknown routes serve empty collections
/// - `test_fetch_failure_injection`: Per-route network failures
///
/// ## Upload Tests
/// - `test_create_logs_and_assigns_id`: Request log and server ids
/// - `test_create_failure_injection`: Global upload failures
/// - `test_rejection_matches_field`: Targeted 422 rejection
/// - `test_transient_create_failures`: Temporary failures for retry testing
///
/// ## Builder Tests
/// - `test_builder_collections`: Canned data via the builder
///
/// ## Counter Tests
/// - `test_counts`: Fetch and upload counters
///
/// # Running Tests
///
/// ```bash
/// cargo test -p firehall-offline mock::tests
/// ```
#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tenant() -> TenantId {
        TenantId::new("station-12")
    }

    #[tokio::test]
    async fn test_fetch_canned_collection() {
        let remote = MockRemote::new();
        remote
            .set_collection("buildings", vec![json!({"id": "b-1"}), json!({"id": "b-2"})])
            .await;

        let records = remote.fetch_collection(&tenant(), "buildings").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], "b-1");
    }

    #[tokio::test]
    async fn test_fetch_unknown_path_is_empty() {
        let remote = MockRemote::new();
        let records = remote.fetch_collection(&tenant(), "nothing-here").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_injection() {
        let remote = MockRemote::new();
        remote.set_collection("buildings", vec![json!({"id": "b-1"})]).await;
        remote.fail_collection("buildings", "gateway timeout").await;

        let err = remote
            .fetch_collection(&tenant(), "buildings")
            .await
            .unwrap_err();
        assert!(err.is_network());
        assert!(err.to_string().contains("gateway timeout"));

        remote.clear_collection_failure("buildings").await;
        assert!(remote.fetch_collection(&tenant(), "buildings").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_logs_and_assigns_id() {
        let remote = MockRemote::new();

        let stored = remote
            .create_record(&tenant(), "inspections", json!({"buildingId": "b-1"}))
            .await
            .unwrap();
        assert_eq!(stored["id"], "srv-000001");
        assert_eq!(stored["buildingId"], "b-1");

        let created = remote.created_records().await;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, "inspections");
        // The log keeps the request as it arrived, without the server id.
        assert!(created[0].1.get("id").is_none());
    }

    #[tokio::test]
    async fn test_create_failure_injection() {
        let remote = MockRemote::new();
        remote.set_should_fail_creates(true, Some("cell dead zone")).await;

        let err = remote
            .create_record(&tenant(), "inspections", json!({}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cell dead zone"));
        assert!(remote.created_records().await.is_empty());

        remote.set_should_fail_creates(false, None).await;
        assert!(remote.create_record(&tenant(), "inspections", json!({})).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejection_matches_field() {
        let remote = MockRemote::new();
        remote
            .reject_matching("buildingId", json!("b-666"), "Unknown building")
            .await;

        let err = remote
            .create_record(&tenant(), "inspections", json!({"buildingId": "b-666"}))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { status: 422, .. }));

        // Other bodies pass.
        assert!(
            remote
                .create_record(&tenant(), "inspections", json!({"buildingId": "b-1"}))
                .await
                .is_ok()
        );

        remote.clear_rejection().await;
        assert!(
            remote
                .create_record(&tenant(), "inspections", json!({"buildingId": "b-666"}))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_transient_create_failures() {
        let remote = MockRemote::new();
        remote.set_transient_create_failures(2);

        // First two uploads fail
        assert!(remote.create_record(&tenant(), "inspections", json!({})).await.is_err());
        assert!(remote.create_record(&tenant(), "inspections", json!({})).await.is_err());
        assert_eq!(remote.remaining_failures(), 0);

        // Third succeeds
        assert!(remote.create_record(&tenant(), "inspections", json!({})).await.is_ok());

        remote.reset_transient_failures();
        assert_eq!(remote.remaining_failures(), 2);
    }

    #[tokio::test]
    async fn test_counts() {
        let remote = MockRemote::new();
        assert_eq!(remote.fetch_count(), 0);
        assert_eq!(remote.create_count(), 0);

        remote.fetch_collection(&tenant(), "buildings").await.unwrap();
        remote.create_record(&tenant(), "inspections", json!({})).await.unwrap();
        remote.fetch_collection(&tenant(), "buildings").await.unwrap();

        assert_eq!(remote.fetch_count(), 2);
        assert_eq!(remote.create_count(), 1);

        remote.reset_counts();
        assert_eq!(remote.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_builder_collections() {
        let remote = MockRemoteBuilder::new()
            .collection("buildings", vec![json!({"id": "b-1"})])
            .collection("inspection-templates", vec![json!({"id": "t-1"})])
            .build();

        let records = remote.fetch_collection(&tenant(), "buildings").await.unwrap();
        assert_eq!(records.len(), 1);
        let records = remote
            .fetch_collection(&tenant(), "inspection-templates")
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_remote_debug() {
        let remote = MockRemote::new();
        let debug_str = format!("{:?}", remote);
        assert!(debug_str.contains("MockRemote"));
    }
}
