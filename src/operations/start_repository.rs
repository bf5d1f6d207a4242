//! Bootstrap a git repository and push it to a remote.
//!
//! `git init` → `git add .` → first commit → add `origin` → push. If adding
//! the remote fails (usually because `origin` already exists) the failure
//! handler points the existing remote at the new URL instead.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use crate::config::RepositoryConfig;
use crate::operation::{FailureHandler, Operation, Options, StepResult};
use crate::shell::CommandRunner;

/// Position of `git remote add`.
pub const ADD_REMOTE: usize = 3;

/// Options key listing every command run so far.
pub const COMMANDS_KEY: &str = "commands";

/// Input of a bootstrap run.
#[derive(Clone)]
pub struct RepositoryParams {
    pub remote: String,
    pub branch: String,
    pub commit_message: String,
    pub directory: Option<PathBuf>,
    pub runner: Arc<dyn CommandRunner>,
}

impl RepositoryParams {
    /// Build params from config defaults.
    pub fn from_config(
        config: &RepositoryConfig,
        remote: String,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            remote,
            branch: config.branch.clone(),
            commit_message: config.commit_message.clone(),
            directory: None,
            runner,
        }
    }
}

/// Build the start-repository operation.
pub fn start_repository() -> Operation<RepositoryParams> {
    let mut op: Operation<RepositoryParams> = Operation::new("start_repository");
    op.step("git_init", |params, options| {
        git(params, options, "git init .")
    });
    op.step("add_all", |params, options| {
        git(params, options, "git add .")
    });
    op.step("first_commit", |params, options| {
        let command = format!("git commit -m {}", shell_quote(&params.commit_message));
        git(params, options, &command)
    });
    op.step("add_remote", |params, options| {
        if params.remote.trim().is_empty() {
            anyhow::bail!("no remote URL given");
        }
        let command = format!("git remote add origin {}", shell_quote(&params.remote));
        git(params, options, &command)
    });
    op.register_failure(
        ADD_REMOTE,
        FailureHandler::<RepositoryParams>::new(|failure, params, options| {
            if params.remote.trim().is_empty() {
                return Err(anyhow::anyhow!("cannot recover: {}", failure.cause));
            }
            let command = format!("git remote set-url origin {}", shell_quote(&params.remote));
            git(params, options, &command)
        }),
    );
    op.step("push", |params, options| {
        let command = format!("git push -u origin {}", shell_quote(&params.branch));
        git(params, options, &command)
    });
    op
}

fn git(params: &RepositoryParams, options: &mut Options, command: &str) -> StepResult {
    debug!(command, "running");
    let output = params
        .runner
        .run(command, params.directory.as_deref())?
        .check(command)?;

    let mut commands: Vec<String> = options.get_as(COMMANDS_KEY)?.unwrap_or_default();
    commands.push(command.to_string());
    options.insert_as(COMMANDS_KEY, &commands)?;

    Ok(json!({ "command": command, "stdout": output.stdout.trim() }))
}

/// Quote `value` for a POSIX shell.
pub fn shell_quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@".contains(c))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Commands recorded in a run's options.
pub fn recorded_commands(options: &Options) -> Vec<String> {
    options
        .get(COMMANDS_KEY)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
