//! Error types for todo
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, invalid input, unknown task)
//! - 4: Operation failed (storage, IO, lock contention)

use std::path::PathBuf;
use thiserror::Error;

use crate::validate::ValidationErrors;

/// Exit codes for the todo CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for todo operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Ambiguous task id '{input}': {}", .matches.join(", "))]
    AmbiguousTaskId { input: String, matches: Vec<String> },

    // Operation failures (exit code 4)
    #[error("Failed to persist '{key}': {reason}")]
    PersistenceWriteFailed { key: String, reason: String },

    #[error("Stored value for '{key}' is corrupt: {reason}")]
    PersistenceReadCorrupt { key: String, reason: String },

    #[error("Storage quota exceeded for '{key}': {size} bytes > {limit} bytes")]
    QuotaExceeded { key: String, size: u64, limit: u64 },

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::Validation(_)
            | Error::TaskNotFound(_)
            | Error::AmbiguousTaskId { .. } => exit_codes::USER_ERROR,

            // Operation failures
            Error::PersistenceWriteFailed { .. }
            | Error::PersistenceReadCorrupt { .. }
            | Error::QuotaExceeded { .. }
            | Error::LockFailed(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Validation(errors) => serde_json::to_value(errors).ok(),
            Error::AmbiguousTaskId { matches, .. } => {
                Some(serde_json::json!({ "matches": matches }))
            }
            Error::QuotaExceeded { size, limit, .. } => {
                Some(serde_json::json!({ "size": size, "limit": limit }))
            }
            _ => None,
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

/// Result type alias for todo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
