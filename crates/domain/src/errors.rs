//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Payline
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PaylineError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One or more validation rules rejected a candidate time record.
    ///
    /// Displays the reasons joined by `"; "`, which is the message surfaced to
    /// manual-entry callers.
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaylineError {
    /// Stable label suitable for structured logging fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Validation(_) => "validation",
            Self::Internal(_) => "internal",
        }
    }

    /// Validation reasons, if this is a validation failure.
    pub fn violations(&self) -> Option<&[String]> {
        match self {
            Self::Validation(reasons) => Some(reasons),
            _ => None,
        }
    }
}

/// Result type alias for Payline operations
pub type Result<T> = std::result::Result<T, PaylineError>;
