//! Remote API abstraction.
//!
//! The offline layer never talks HTTP directly. Everything it needs from
//! the backend goes through the [`RemoteApi`] trait, so production code can
//! plug in a real client while tests run against [`crate::MockRemote`].

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use firehall_types::{ReferencePartition, TenantId};

/// Errors produced by a remote API implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RemoteError {
    /// The request never reached the server (no connectivity, DNS failure,
    /// timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a failure status.
    #[error("Server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The server answered, but the body was not usable.
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Create a network error from any displayable cause.
    pub fn network(cause: impl Into<String>) -> Self {
        Self::Network(cause.into())
    }

    /// Create a rejection with an HTTP-style status code.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Check if the error means the server was never reached.
    ///
    /// Useful for callers that retry on connectivity problems but treat
    /// rejections as permanent.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Result type for remote API operations.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Server paths for the collections the offline layer touches.
///
/// Defaults match the backend's route names. Deployments that mount the
/// API elsewhere override individual fields.
///
/// # Example
///
/// ```
/// use firehall_offline::ApiRoutes;
///
/// let routes = ApiRoutes {
///     inspections: "field-inspections".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(routes.buildings, "buildings");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoutes {
    /// Collection of buildings for the tenant.
    pub buildings: String,
    /// Collection of inspection templates.
    pub inspection_templates: String,
    /// Collection of intervention plans.
    pub intervention_plans: String,
    /// Collection pending inspections are uploaded to.
    pub inspections: String,
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self {
            buildings: "buildings".to_string(),
            inspection_templates: "inspection-templates".to_string(),
            intervention_plans: "intervention-plans".to_string(),
            inspections: "inspections".to_string(),
        }
    }
}

impl ApiRoutes {
    /// Path for a reference partition's source collection.
    #[must_use]
    pub fn for_partition(&self, partition: ReferencePartition) -> &str {
        match partition {
            ReferencePartition::Buildings => &self.buildings,
            ReferencePartition::InspectionTemplates => &self.inspection_templates,
            ReferencePartition::InterventionPlans => &self.intervention_plans,
        }
    }
}

/// Operations the offline layer needs from the backend.
///
/// Implementations must be safe to share across tasks. All methods take
/// the tenant explicitly; implementations are expected to scope both
/// reads and writes to it.
///
/// # Example
///
/// ```ignore
/// use firehall_offline::{RemoteApi, RemoteResult, TenantId};
///
/// async fn building_count(api: &dyn RemoteApi, tenant: &TenantId) -> RemoteResult<usize> {
///     let records = api.fetch_collection(tenant, "buildings").await?;
///     Ok(records.len())
/// }
/// ```
#[async_trait]
pub trait RemoteApi: Send + Sync {
    // --- Reference data ---

    /// Fetch every record of a server collection for the tenant.
    ///
    /// Records come back as raw JSON values; the caller decodes them into
    /// typed records and decides what to do with ones that do not parse.
    async fn fetch_collection(&self, tenant: &TenantId, path: &str) -> RemoteResult<Vec<Value>>;

    // --- Uploads ---

    /// Create a record in a server collection for the tenant.
    ///
    /// Returns the record as the server stored it, including any
    /// server-assigned fields.
    async fn create_record(&self, tenant: &TenantId, path: &str, body: Value)
    -> RemoteResult<Value>;
}
