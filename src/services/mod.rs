//! Collaborators consumed by the bundled operations.
//!
//! Each capability is a trait so operations can be run against real or stub
//! implementations. Instances are built by the caller and shared through
//! `Arc` in the operation's params.

pub mod notifier;
pub mod password;
pub mod repository;

pub use notifier::{ConsoleMailer, Notifier, NotifierError};
pub use password::{hash_password, verify_password};
pub use repository::{InMemoryUserRepository, NewUser, RepositoryError, User, UserRepository};
