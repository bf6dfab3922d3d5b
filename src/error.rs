//! Error types for docker-ucp

use thiserror::Error;

/// Result type for docker-ucp operations
pub type Result<T> = std::result::Result<T, UcpError>;

/// docker-ucp error types
#[derive(Error, Debug)]
pub enum UcpError {
    /// Raised while resolving configuration, before any command runs
    #[error("Validation error: {0}")]
    Validation(String),

    /// A command exhausted its retry budget
    #[error(
        "{title} failed after {attempts} attempt(s) (exit code {}): {output}",
        .exit_code.map_or_else(|| "none".to_string(), |code| code.to_string())
    )]
    Execution {
        title: String,
        attempts: u32,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("Manifest parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UcpError {
    pub(crate) fn validation<S: Into<String>>(message: S) -> Self {
        UcpError::Validation(message.into())
    }

    /// Whether the error was raised before anything was executed
    pub fn is_validation(&self) -> bool {
        matches!(self, UcpError::Validation(_))
    }
}
