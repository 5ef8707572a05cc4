//! Identifier types shared across the Firehall offline stack.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Prefix carried by every locally minted record id.
///
/// Server-assigned ids never start with this prefix, so the two id spaces
/// cannot collide.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Opaque identifier for a fire department (tenant).
///
/// Every cached collection belongs to exactly one tenant; the id is treated
/// as an opaque string and compared byte-for-byte.
///
/// # Examples
///
/// ```
/// use firehall_types::TenantId;
///
/// let tenant = TenantId::new("dept-42");
/// assert_eq!(tenant.as_str(), "dept-42");
/// assert_eq!(tenant.to_string(), "dept-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Create a tenant id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TenantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Identifier for a record created on this device while offline.
///
/// Local ids are minted from a timestamp plus a random suffix and always
/// carry [`LOCAL_ID_PREFIX`]. They identify a pending record until the
/// server accepts it and assigns a real id.
///
/// # Examples
///
/// ```
/// use firehall_types::LocalId;
///
/// let id = LocalId::new("local-1706000000000-00c0ffee");
/// assert!(id.is_locally_minted());
///
/// let server_id = LocalId::new("8812");
/// assert!(!server_id.is_locally_minted());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(String);

impl LocalId {
    /// Wrap an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id was minted on a device rather than assigned by the
    /// server.
    #[must_use]
    pub fn is_locally_minted(&self) -> bool {
        self.0.starts_with(LOCAL_ID_PREFIX)
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LocalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for LocalId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}
