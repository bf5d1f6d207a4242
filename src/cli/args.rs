//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stepline - run sequential operations with positional failure handlers.
#[derive(Debug, Parser)]
#[command(name = "stepline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .stepline/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show every executed step
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Place a food order
    Order,

    /// Register a user and send the welcome email
    Register(RegisterArgs),

    /// Initialize a git repository and push it to a remote
    StartRepo(StartRepoArgs),

    /// Show resolved configuration
    Config,
}

/// Arguments for the `register` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RegisterArgs {
    /// Email of the new user
    #[arg(long, env = "STEPLINE_EMAIL")]
    pub email: String,

    /// Password of the new user
    #[arg(long, env = "STEPLINE_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Register the same user a second time
    #[arg(long)]
    pub again: bool,
}

/// Arguments for the `start-repo` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StartRepoArgs {
    /// Remote URL (overrides repository.remote)
    #[arg(long)]
    pub remote: Option<String>,

    /// Branch to push (overrides repository.branch)
    #[arg(long)]
    pub branch: Option<String>,

    /// Directory to initialize (defaults to the project root)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Print the git commands without running them
    #[arg(long)]
    pub dry_run: bool,
}
