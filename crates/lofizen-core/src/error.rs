//! Core error types for lofizen-core.
//!
//! Three failure families, handled differently by callers:
//! invalid-state errors indicate a caller bug and are surfaced,
//! storage errors are recovered by logging and staying in-memory,
//! validation errors reject input before any state is mutated.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lofizen-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Operation attempted in the wrong timer state (caller bug).
    #[error("invalid timer state: {0}")]
    InvalidState(String),

    /// Storage-related errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced record does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the store
    #[error("failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("store migration failed: {0}")]
    MigrationFailed(String),

    /// Store is locked by another process
    #[error("store is locked")]
    Locked,

    /// Record could not be encoded/decoded
    #[error("record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Validation errors, raised at the boundary before mutating state.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Duration must be a positive number of milliseconds
    #[error("duration for '{field}' must be greater than zero")]
    ZeroDuration { field: String },
}

impl ValidationError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
