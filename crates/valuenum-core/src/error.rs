//! Core error types for valuenum-core.
//!
//! Engine failures are kept apart from infrastructure failures so callers
//! can map the former to a rejected request and the latter to an internal
//! error without inspecting messages.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for valuenum-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Calculation rejected by the engine
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Submitted record rejected by validation
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bearer token errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Failures raised by the Value Engine.
///
/// Both variants describe a rejected calculation, never a crash.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A time value or numeric field is outside its declared range
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// The formula denominator evaluated to zero
    #[error("Division by zero in {formula}: denominator evaluated to zero")]
    DivisionByZero { formula: &'static str },
}

impl EngineError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validation failures for submitted records (status checks, leads).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Invalid value for '{field}': {message}")]
    InvalidField { field: &'static str, message: String },
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Stored row could not be decoded
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No usable data directory
    #[error("Cannot determine data directory: {0}")]
    DataDir(String),
}

/// Bearer token errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Token is not three base64url segments of valid JSON
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Signature does not match
    #[error("Token signature mismatch")]
    BadSignature,

    /// Token `exp` is in the past
    #[error("Token expired")]
    Expired,

    /// No signing secret configured
    #[error("Token signing secret is not configured")]
    MissingSecret,

    /// Expiry would fall outside the representable date range
    #[error("Token lifetime is out of range")]
    InvalidTtl,
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_passes_through_core_error_display() {
        let err: CoreError = EngineError::DivisionByZero { formula: "S-formula" }.into();
        assert_eq!(
            err.to_string(),
            "Division by zero in S-formula: denominator evaluated to zero"
        );
    }

    #[test]
    fn rusqlite_errors_become_query_failures() {
        let err: DatabaseError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }
}
