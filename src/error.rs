//! Error handling module for headstart
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Library code returns [`Result`]; the binary wraps it in `anyhow` at the edge.

use thiserror::Error;

/// Main error type for headstart
#[derive(Error, Debug)]
pub enum HeadstartError {
    /// Bad app name, pre-existing target directory, or inconsistent answers.
    /// Always raised before anything touches the disk.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A plan step failed; the run stopped at this feature.
    #[error("{feature} failed: {message}")]
    ActionExecution { feature: String, message: String },

    /// The catalog is inconsistent (duplicate name, missing entry).
    /// Indicates a programming error, never a user error.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Required tooling is missing from PATH
    #[error("Preflight check failed: {0}")]
    Preflight(String),

    /// Terminal prompt errors (raw mode, key events, aborted input)
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for headstart operations
pub type Result<T> = std::result::Result<T, HeadstartError>;

impl HeadstartError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an action execution error for the given feature
    pub fn action(feature: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ActionExecution {
            feature: feature.into(),
            message: message.into(),
        }
    }

    /// Create a catalog consistency error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a preflight error
    pub fn preflight(msg: impl Into<String>) -> Self {
        Self::Preflight(msg.into())
    }

    /// Create a prompt error
    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    /// The feature that triggered an execution failure, if any.
    pub fn failed_feature(&self) -> Option<&str> {
        match self {
            Self::ActionExecution { feature, .. } => Some(feature),
            _ => None,
        }
    }
}
