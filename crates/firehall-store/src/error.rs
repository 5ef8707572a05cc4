//! Error types for firehall-store.

use std::path::PathBuf;

/// Result type for firehall-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in firehall-store.
///
/// SQLite failures are classified on conversion: errors that mean the
/// storage medium cannot be used right now become [`Error::Unavailable`],
/// errors that mean the database file itself is broken become
/// [`Error::Corrupt`], and everything else stays [`Error::Database`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Storage cannot be opened or written right now (missing volume,
    /// permissions, disk full, held lock). Retrying later may succeed.
    #[error("Storage unavailable: {0}")]
    Unavailable(rusqlite::Error),

    /// The database file or its schema is unusable. The recovery path is
    /// [`Store::reset`](crate::Store::reset), which discards local data.
    #[error("Storage corrupt: {0}")]
    Corrupt(String),

    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means storage is temporarily unusable.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Unavailable(_))
    }

    /// Whether this error means the database must be reset.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Error::Corrupt(_))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match &err {
            rusqlite::Error::SqliteFailure(code, _) => match code.code {
                ErrorCode::CannotOpen
                | ErrorCode::PermissionDenied
                | ErrorCode::ReadOnly
                | ErrorCode::DiskFull
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked => Error::Unavailable(err),
                ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt => {
                    Error::Corrupt(err.to_string())
                }
                _ => Error::Database(err),
            },
            _ => Error::Database(err),
        }
    }
}
