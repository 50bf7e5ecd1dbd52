//! Error types for pm-migrate
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, invalid config)
//! - 4: Operation failed (unreadable export, structural payload failure)
//!
//! Field-level degradations (unparseable dates, missing custom fields,
//! unknown users) are not errors; the engine logs them and substitutes a
//! sentinel or omits the field.

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the pm-migrate CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for pm-migrate operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Export file not found: {0}")]
    ExportNotFound(PathBuf),

    // Operation failures (exit code 4)
    #[error("Project payload has no name")]
    MissingProjectName,

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
            Error::InvalidConfig(_) | Error::InvalidArgument(_) | Error::ExportNotFound(_) => {
                exit_codes::USER_ERROR
            }

            Error::MissingProjectName
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for machine-readable output, when the variant carries any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::ExportNotFound(path) => Some(serde_json::json!({
                "path": path.to_string_lossy(),
            })),
            Error::Json(err) => Some(serde_json::json!({
                "line": err.line(),
                "column": err.column(),
            })),
            _ => None,
        }
    }
}

/// Result type alias for pm-migrate operations
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
