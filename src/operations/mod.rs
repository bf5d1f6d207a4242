//! Ready-made operations built on the engine.
//!
//! - [`place_order`] - builds an order entirely inside the run context
//! - [`register_user`] - duplicate check, hashing, storage and email with
//!   per-step failure handlers
//! - [`start_repository`] - bootstraps a git repository through a
//!   [`CommandRunner`](crate::shell::CommandRunner)

pub mod place_order;
pub mod register_user;
pub mod start_repository;

pub use place_order::{double_item, place_an_order, OrderError};
pub use register_user::{register_user, Registration, RegistrationError, RegistrationParams};
pub use start_repository::{recorded_commands, shell_quote, start_repository, RepositoryParams};
