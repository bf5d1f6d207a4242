//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::Commands;
use crate::config::SteplineConfig;
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config: SteplineConfig,
}

impl CommandDispatcher {
    /// Create a dispatcher for `project_root` with an already resolved config.
    pub fn new(project_root: PathBuf, config: SteplineConfig) -> Self {
        Self {
            project_root,
            config,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the resolved configuration.
    pub fn config(&self) -> &SteplineConfig {
        &self.config
    }

    /// Dispatch and execute a command.
    pub fn dispatch(
        &self,
        command: &Commands,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        match command {
            Commands::Order => super::order::OrderCommand::new().execute(ui),
            Commands::Register(args) => {
                let cmd = super::register::RegisterCommand::new(args.clone(), &self.config);
                cmd.execute(ui)
            }
            Commands::StartRepo(args) => {
                let cmd = super::start_repo::StartRepoCommand::new(
                    &self.project_root,
                    args.clone(),
                    &self.config,
                );
                cmd.execute(ui)
            }
            Commands::Config => {
                let cmd = super::config::ConfigCommand::new(&self.project_root, &self.config);
                cmd.execute(ui)
            }
        }
    }
}
