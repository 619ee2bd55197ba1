//! Error types and exit codes for vaultdb
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args, missing query condition)
//! - 3: Data/store error (missing vault, record not found)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<rusqlite::Error> for VaultError {
    fn from(err: rusqlite::Error) -> Self {
        VaultError::Other(err.to_string())
    }
}

/// Errors that can occur while indexing or querying a vault
#[derive(Error, Debug)]
pub enum VaultError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("{operation} requires at least one condition")]
    MissingCondition { operation: String },

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data/store errors (exit code 3)
    #[error("vault directory not found: {path:?}")]
    VaultNotFound { path: PathBuf },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl VaultError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        VaultError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed transaction operation
    pub fn transaction(operation: &str, error: impl std::fmt::Display) -> Self {
        VaultError::FailedOperation {
            operation: format!("{} transaction", operation),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed field extraction from a database row
    pub fn field_extraction(field: &str, error: impl std::fmt::Display) -> Self {
        VaultError::FailedOperation {
            operation: format!("get {}", field),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        VaultError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        VaultError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        VaultError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a query issued without any condition
    pub fn missing_condition(operation: &str) -> Self {
        VaultError::MissingCondition {
            operation: operation.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            VaultError::UnknownFormat(_)
            | VaultError::UsageError(_)
            | VaultError::MissingCondition { .. }
            | VaultError::InvalidValue { .. } => ExitCode::Usage,

            VaultError::VaultNotFound { .. } | VaultError::NotFound { .. } => ExitCode::Data,

            VaultError::Io(_)
            | VaultError::Json(_)
            | VaultError::Toml(_)
            | VaultError::FailedOperation { .. }
            | VaultError::FailedOperationWithTarget { .. }
            | VaultError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            VaultError::UnknownFormat(_) => "unknown_format",
            VaultError::UsageError(_) => "usage_error",
            VaultError::MissingCondition { .. } => "missing_condition",
            VaultError::InvalidValue { .. } => "invalid_value",
            VaultError::VaultNotFound { .. } => "vault_not_found",
            VaultError::NotFound { .. } => "not_found",
            VaultError::Io(_) => "io_error",
            VaultError::Json(_) => "json_error",
            VaultError::Toml(_) => "toml_error",
            VaultError::FailedOperation { .. } => "failed_operation",
            VaultError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            VaultError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for vaultdb operations
pub type Result<T> = std::result::Result<T, VaultError>;
