//! Error types for stepline.
//!
//! This module defines [`SteplineError`], the error type used by the
//! configuration, shell and CLI layers, and a [`Result`] type alias for
//! convenience.
//!
//! # Error Handling Strategy
//!
//! - Engine failures are [`OperationError`]s and are wrapped here when they
//!   reach the CLI
//! - Steps and failure handlers return `anyhow::Error`, so domain errors keep
//!   their concrete type and can be downcast by callers
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

use crate::operation::OperationError;

/// Core error type for stepline.
#[derive(Debug, Error)]
pub enum SteplineError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// An operation run ended with a terminal failure.
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for stepline.
pub type Result<T> = std::result::Result<T, SteplineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::StepFailure;

    #[test]
    fn config_not_found_displays_path() {
        let err = SteplineError::ConfigNotFound {
            path: PathBuf::from("/foo/config.yml"),
        };
        assert!(err.to_string().contains("/foo/config.yml"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = SteplineError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn config_validation_error_displays_message() {
        let err = SteplineError::ConfigValidationError {
            message: "branch must not be empty".into(),
        };
        assert!(err.to_string().contains("branch must not be empty"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SteplineError::CommandFailed {
            command: "git push -u origin master".into(),
            code: Some(128),
        };
        let msg = err.to_string();
        assert!(msg.contains("git push"));
        assert!(msg.contains("128"));
    }

    #[test]
    fn operation_error_converts_transparently() {
        let op_err = OperationError::Unhandled(StepFailure::new(
            2,
            "persist",
            anyhow::anyhow!("db down"),
        ));
        let expected = op_err.to_string();
        let err: SteplineError = op_err.into();
        assert!(matches!(err, SteplineError::Operation(_)));
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SteplineError = io_err.into();
        assert!(matches!(err, SteplineError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(SteplineError::ConfigValidationError {
                message: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
