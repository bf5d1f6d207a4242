//! Configuration validation rules.
//!
//! - The repository branch must not be empty
//! - The mailer greeting must mention `{email}`
//! - The log level must be a valid filter directive

use crate::config::schema::SteplineConfig;
use crate::error::{Result, SteplineError};
use tracing_subscriber::EnvFilter;

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

/// Validate a configuration and return all errors.
///
/// Collects every error rather than stopping at the first one.
pub fn validate_config(config: &SteplineConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.repository.branch.trim().is_empty() {
        errors.push(ValidationError {
            rule: "empty-branch".to_string(),
            message: "repository.branch must not be empty".to_string(),
        });
    }

    if !config.mailer.greeting.contains("{email}") {
        errors.push(ValidationError {
            rule: "greeting-placeholder".to_string(),
            message: "mailer.greeting must contain '{email}'".to_string(),
        });
    }

    if EnvFilter::try_new(config.settings.log_filter()).is_err() {
        errors.push(ValidationError {
            rule: "log-level".to_string(),
            message: format!(
                "settings.log_level '{}' is not a valid filter",
                config.settings.log_level
            ),
        });
    }

    errors
}

/// Validate a configuration, failing on the first batch of errors.
pub fn validate(config: &SteplineConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(SteplineError::ConfigValidationError { message })
}
