//! Register command implementation.
//!
//! `stepline register` runs the registration operation against a fresh
//! in-memory repository and the console mailer.

use std::sync::Arc;

use crate::cli::args::RegisterArgs;
use crate::config::SteplineConfig;
use crate::error::{Result, SteplineError};
use crate::operations::{register_user, Registration, RegistrationError, RegistrationParams};
use crate::services::{ConsoleMailer, InMemoryUserRepository};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display::{error_chain, show_report};

/// The register command implementation.
pub struct RegisterCommand {
    args: RegisterArgs,
    config: SteplineConfig,
}

impl RegisterCommand {
    /// Create a new register command.
    pub fn new(args: RegisterArgs, config: &SteplineConfig) -> Self {
        Self {
            args,
            config: config.clone(),
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RegisterArgs {
        &self.args
    }
}

impl Command for RegisterCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let operation = register_user();
        let params = RegistrationParams {
            email: self.args.email.clone(),
            password: self.args.password.clone(),
            users: InMemoryUserRepository::shared(),
            notifier: Arc::new(ConsoleMailer::with_config(self.config.mailer.clone())),
        };
        let attempts = if self.args.again { 2 } else { 1 };

        ui.show_header(operation.name());
        for _ in 0..attempts {
            match operation.execute(&params) {
                Ok(report) => {
                    show_report(ui, &report);
                    let registration = Registration::from_result(report.result)
                        .map_err(|e| SteplineError::Other(e.into()))?;
                    ui.success(&format!("Registered {}", registration.user.email));
                    ui.message(&format!("  email sent: {}", registration.email_sent));
                }
                Err(err) => {
                    let message = match err.downcast_ref::<RegistrationError>() {
                        Some(domain) => domain.to_string(),
                        None => error_chain(err),
                    };
                    ui.error(&message);
                    return Ok(CommandResult::failure(1));
                }
            }
        }

        Ok(CommandResult::success())
    }
}
