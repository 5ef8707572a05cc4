//! Error types for record handling in firehall-types.

use thiserror::Error;

/// Errors that can occur when building inspection payloads.
///
/// This error type is storage-agnostic and does not include
/// persistence or network errors (those belong in the layers above).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    /// The payload was not a JSON object.
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Result type alias using firehall-types' `RecordError` type.
pub type RecordResult<T> = std::result::Result<T, RecordError>;
