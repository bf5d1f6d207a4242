//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`], which owns the resolved configuration.

pub mod config;
pub mod dispatcher;
pub mod display;
pub mod order;
pub mod register;
pub mod start_repo;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
