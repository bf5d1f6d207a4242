//! Shell command execution.

pub mod command;

pub use command::{
    absolute_dir, execute, CommandOutput, CommandRunner, RecordingRunner, ShellRunner,
};
