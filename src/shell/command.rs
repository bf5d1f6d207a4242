//! Shell command execution.

use crate::error::{Result, SteplineError};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandOutput {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Turn a non-zero exit into [`SteplineError::CommandFailed`].
    pub fn check(self, command: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(SteplineError::CommandFailed {
                command: command.to_string(),
                code: self.exit_code,
            })
        }
    }
}

/// Runs shell commands for operation steps.
pub trait CommandRunner: Send + Sync {
    /// Run `command`, optionally inside `cwd`.
    ///
    /// A non-zero exit is reported in the output, not as an error. Errors are
    /// reserved for commands that could not be started.
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput>;
}

/// Runs commands through the user's shell.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput> {
        execute(command, cwd)
    }
}

/// Records commands instead of running them.
///
/// Used for dry runs and tests. Commands listed in `failing` report exit code
/// 1 so failure paths can be exercised.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<String>>,
    failing: Vec<String>,
}

impl RecordingRunner {
    /// Create a runner where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner where commands starting with any of `prefixes` fail.
    pub fn failing_on(prefixes: &[&str]) -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            failing: prefixes.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Commands seen so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .map(|commands| commands.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &str, _cwd: Option<&Path>) -> Result<CommandOutput> {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command.to_string());
        }
        if self.failing.iter().any(|p| command.starts_with(p.as_str())) {
            Ok(CommandOutput::failure(
                Some(1),
                String::new(),
                String::new(),
                Duration::ZERO,
            ))
        } else {
            Ok(CommandOutput::success(
                String::new(),
                String::new(),
                Duration::ZERO,
            ))
        }
    }
}

/// Execute a shell command, capturing its output.
pub fn execute(command: &str, cwd: Option<&Path>) -> Result<CommandOutput> {
    let start = Instant::now();

    let shell = detect_shell();
    let mut cmd = Command::new(&shell);
    cmd.arg(shell_flag());
    cmd.arg(command);

    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }

    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().map_err(|_| SteplineError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandOutput::success(stdout, stderr, duration))
    } else {
        Ok(CommandOutput::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Resolve `dir` against the current directory when it is relative.
pub fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}

/// Detect the current shell.
fn detect_shell() -> String {
    if cfg!(target_os = "windows") {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
    } else {
        "/bin/sh".to_string()
    }
}

/// Get the flag to pass commands to the shell.
fn shell_flag() -> &'static str {
    if cfg!(target_os = "windows") {
        "/C"
    } else {
        "-c"
    }
}
