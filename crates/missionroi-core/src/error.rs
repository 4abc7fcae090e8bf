//! Core error types for missionroi-core.
//!
//! Decision-producing operations return [`CoreError`]. Signal sinks return
//! [`SignalWriteError`], which emitters swallow and log so observability can
//! never fail a decision.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for missionroi-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An operation referenced a mission id that is not tracked
    #[error("Mission not found: {0}")]
    NotFound(String),

    /// A mission with the same id already exists
    #[error("Mission already exists: {0}")]
    Conflict(String),

    /// Non-positive effort/payoff/budget, out-of-range confidence, etc.
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine or create the data directory
    #[error("Failed to resolve data directory: {0}")]
    DataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Failure to append a signal to its stream.
#[derive(Error, Debug)]
pub enum SignalWriteError {
    #[error("Failed to write signal to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode signal: {0}")]
    Encode(#[from] serde_json::Error),

    /// The background writer task has shut down
    #[error("Signal channel closed")]
    ChannelClosed,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_message_names_field() {
        let err = CoreError::invalid("effort_minutes", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'effort_minutes': must be positive"
        );
    }

    #[test]
    fn config_error_converts_into_core_error() {
        let err: CoreError = ConfigError::UnknownKey("budget.nope".into()).into();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }
}
