//! stepline - sequential operations with positional failure handlers.
//!
//! An operation is an ordered list of steps that share a per-run context.
//! When a step fails, the failure handler registered at that step's position
//! decides whether the run recovers and moves on or stops with an error.
//!
//! # Modules
//!
//! - [`operation`] - The engine: steps, failure handlers, options, run loop
//! - [`operations`] - Ready-made operations (order, registration, git bootstrap)
//! - [`services`] - Capabilities the operations depend on
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`shell`] - Shell command execution
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use stepline::operation::Operation;
//!
//! let mut op: Operation<()> = Operation::new("retry");
//! op.step("flaky", |_, _| Err(anyhow::anyhow!("offline")));
//! op.on_failure(|_, _, options| {
//!     options.insert("fallback", true);
//!     Ok(json!("cached"))
//! });
//! op.step("finish", |_, options| Ok(json!(options.get("fallback").cloned())));
//!
//! assert_eq!(op.run(&()).unwrap(), json!(true));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod operation;
pub mod operations;
pub mod services;
pub mod shell;
pub mod ui;

pub use error::{Result, SteplineError};
