//! Notification capability.

use thiserror::Error;
use tracing::info;

use crate::config::MailerConfig;

/// Delivery failure.
#[derive(Debug, Error)]
#[error("could not deliver to {target}: {message}")]
pub struct NotifierError {
    pub target: String,
    pub message: String,
}

/// Sends a message to a recipient and returns a receipt.
pub trait Notifier: Send + Sync {
    fn send_to(&self, target: &str) -> Result<String, NotifierError>;
}

/// Notifier that renders a welcome email and logs it instead of sending.
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailer {
    config: MailerConfig,
}

impl ConsoleMailer {
    /// Create a mailer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mailer from config.
    pub fn with_config(config: MailerConfig) -> Self {
        Self { config }
    }

    /// Render the message body for `email`.
    pub fn render(&self, email: &str) -> String {
        let greeting = self.config.greeting.replace("{email}", email);
        format!(
            "<!doctype html><html><body><p>{}</p><p>{}</p></body></html>",
            greeting, self.config.sender
        )
    }
}

impl Notifier for ConsoleMailer {
    fn send_to(&self, target: &str) -> Result<String, NotifierError> {
        if !target.contains('@') {
            return Err(NotifierError {
                target: target.to_string(),
                message: "not an email address".to_string(),
            });
        }
        let body = self.render(target);
        info!(to = target, from = %self.config.sender, "email sent");
        Ok(body)
    }
}
