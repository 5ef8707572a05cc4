//! Error types for the offline layer.

use thiserror::Error;

use firehall_types::ReferencePartition;

use crate::remote::RemoteError;

/// Errors from offline cache operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The local store failed. Storage errors are never swallowed; the
    /// operation that hit one fails as a whole.
    #[error("Storage error: {0}")]
    Store(#[from] firehall_store::Error),

    /// A mandatory snapshot collection could not be fetched.
    #[error("Snapshot fetch failed for {collection}: {source}")]
    SnapshotFetch {
        /// The partition whose source collection failed.
        collection: ReferencePartition,
        /// The underlying remote failure.
        source: RemoteError,
    },

    /// A snapshot collection arrived but a record in it did not decode.
    #[error("Snapshot decode failed for {collection}: {source}")]
    SnapshotDecode {
        /// The partition whose payload was malformed.
        collection: ReferencePartition,
        /// The decode failure.
        source: serde_json::Error,
    },
}

impl Error {
    /// Check if the error came from the local store rather than the network.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result type for offline cache operations.
pub type Result<T> = std::result::Result<T, Error>;
