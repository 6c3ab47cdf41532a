//! Error types for mcp-poke

use std::path::PathBuf;

use thiserror::Error;

use crate::notifier::BackendError;

/// Result type alias using mcp-poke's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for mcp-poke operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file exists but could not be read
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying YAML failure
        #[source]
        source: serde_yaml::Error,
    },

    /// Delivery mode with no notifier behind it
    #[error("unsupported notification mode: {0}")]
    UnsupportedMode(String),

    /// Malformed or missing tool arguments
    #[error("{0}")]
    InvalidArgument(String),

    /// The notification facility rejected the notification
    #[error("Failed to send notification: {0}")]
    Delivery(#[from] BackendError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Whether this error belongs to a single tool call rather than the process
    pub fn is_call_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::Delivery(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_displays_bare_message() {
        let err = Error::invalid_argument("message cannot be empty");
        assert_eq!(err.to_string(), "message cannot be empty");
        assert!(err.is_call_error());
    }

    #[test]
    fn test_startup_errors_are_not_call_errors() {
        let err = Error::UnsupportedMode("command".to_string());
        assert_eq!(err.to_string(), "unsupported notification mode: command");
        assert!(!err.is_call_error());
    }

    #[test]
    fn test_delivery_wraps_backend_error() {
        let err = Error::from(BackendError::Unavailable("no session bus".to_string()));
        assert!(err.is_call_error());
        assert_eq!(
            err.to_string(),
            "Failed to send notification: notification service unavailable: no session bus"
        );
    }
}
