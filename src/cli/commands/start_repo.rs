//! Start-repo command implementation.
//!
//! `stepline start-repo` bootstraps a git repository and pushes it. With
//! `--dry-run` the git commands are recorded and printed instead of run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::StartRepoArgs;
use crate::config::SteplineConfig;
use crate::error::Result;
use crate::operations::{recorded_commands, start_repository, RepositoryParams};
use crate::shell::{absolute_dir, CommandRunner, RecordingRunner, ShellRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display::{error_chain, show_report};

/// The start-repo command implementation.
pub struct StartRepoCommand {
    project_root: PathBuf,
    args: StartRepoArgs,
    config: SteplineConfig,
}

impl StartRepoCommand {
    /// Create a new start-repo command.
    pub fn new(project_root: &Path, args: StartRepoArgs, config: &SteplineConfig) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
            config: config.clone(),
        }
    }

    /// Build run params from flags, falling back to config.
    pub fn params(&self, runner: Arc<dyn CommandRunner>) -> Result<RepositoryParams> {
        let remote = self
            .args
            .remote
            .clone()
            .or_else(|| self.config.repository.remote.clone())
            .unwrap_or_default();
        let mut params = RepositoryParams::from_config(&self.config.repository, remote, runner);
        if let Some(branch) = &self.args.branch {
            params.branch = branch.clone();
        }
        let dir = self.args.dir.as_deref().unwrap_or(&self.project_root);
        params.directory = Some(absolute_dir(dir)?);
        Ok(params)
    }
}

impl Command for StartRepoCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let runner: Arc<dyn CommandRunner> = if self.args.dry_run {
            Arc::new(RecordingRunner::new())
        } else {
            Arc::new(ShellRunner)
        };
        let params = self.params(runner)?;
        let operation = start_repository();

        ui.show_header(operation.name());
        if self.args.dry_run {
            ui.warning("Dry run: commands are recorded, not executed");
        }

        match operation.execute(&params) {
            Ok(report) => {
                show_report(ui, &report);
                for command in recorded_commands(&report.options) {
                    ui.message(&format!("  $ {}", command));
                }
                if report.recovered_count() > 0 {
                    ui.warning("origin already existed; its URL was updated");
                }
                ui.success(&format!("Pushed {} to {}", params.branch, params.remote));
                Ok(CommandResult::success())
            }
            Err(err) => {
                ui.error(&error_chain(err));
                Ok(CommandResult::failure(1))
            }
        }
    }
}
