//! Error handling module for gum
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Every fallible library operation returns [`Result`].

use thiserror::Error;

use crate::engine::ValidationReport;

/// Main error type for gum
#[derive(Error, Debug)]
pub enum GumError {
    /// IO errors (file operations, spawning processes)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors for gum.yml
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors (discovery, shape, unknown named actions)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single action failed its own validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Aggregated result of validating a whole plan
    #[error("{0}")]
    ValidationFailed(ValidationReport),

    /// An external command exited unsuccessfully
    #[error("Command failed: {0}")]
    Command(String),

    /// An action's run failed; the run phase stops here
    #[error("Action {name} ({identifier}) failed: {source}")]
    ActionFailed {
        name: String,
        identifier: String,
        #[source]
        source: Box<GumError>,
    },

    /// The host operating system is not one gum supports
    #[error("Unsupported platform: {0}")]
    Platform(String),
}

/// Result type alias for gum operations
pub type Result<T> = std::result::Result<T, GumError>;

impl GumError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a command error
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Create a platform error
    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform(msg.into())
    }

    /// Wrap a run failure with the identity of the action that produced it
    pub fn action_failed(
        name: impl Into<String>,
        identifier: impl Into<String>,
        source: GumError,
    ) -> Self {
        Self::ActionFailed {
            name: name.into(),
            identifier: identifier.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GumError::config("no gum.yml found");
        assert_eq!(err.to_string(), "Configuration error: no gum.yml found");

        let err = GumError::validation("title is empty");
        assert_eq!(err.to_string(), "Validation error: title is empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GumError = io_err.into();
        assert!(matches!(err, GumError::Io(_)));
    }

    #[test]
    fn test_action_failed_names_the_action() {
        let err = GumError::action_failed("brew", "brew-jq", GumError::command("brew install jq"));
        let text = err.to_string();
        assert!(text.contains("brew"));
        assert!(text.contains("brew-jq"));
        assert!(text.contains("brew install jq"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
