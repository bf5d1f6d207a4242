//! User storage capability.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique email address.
    pub email: String,

    /// Hashed password. Never the plaintext.
    pub password: String,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
}

/// Repository failures.
///
/// "Not found" is not an error: lookups return `Ok(false)` or `Ok(None)`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing store could not be queried.
    #[error("lookup failed for {email}: {message}")]
    Lookup { email: String, message: String },

    /// The record could not be written.
    #[error("could not save user {email}: {message}")]
    Write { email: String, message: String },
}

/// Storage for user records.
pub trait UserRepository: Send + Sync {
    /// Whether a user with this email exists.
    fn exists(&self, email: &str) -> Result<bool, RepositoryError>;

    /// Find a user by email.
    fn find(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Store a new user and return the stored record.
    fn create(&self, user: NewUser) -> Result<User, RepositoryError>;
}

/// Process-local repository backed by a vector.
///
/// Share one instance across runs with `Arc` to simulate a single database.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty repository ready to be shared.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserRepository for InMemoryUserRepository {
    fn exists(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.find(email)?.is_some())
    }

    fn find(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().map_err(|e| RepositoryError::Lookup {
            email: email.to_string(),
            message: e.to_string(),
        })?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.write().map_err(|e| RepositoryError::Write {
            email: user.email.clone(),
            message: e.to_string(),
        })?;
        let record = User {
            email: user.email,
            password: user.password,
            created_at: Utc::now(),
        };
        debug!(email = %record.email, "user stored");
        users.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "hashed".to_string(),
        }
    }

    #[test]
    fn missing_user_is_not_an_error() {
        let repo = InMemoryUserRepository::new();
        assert!(!repo.exists("nobody@test.com").unwrap());
        assert!(repo.find("nobody@test.com").unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[test]
    fn create_then_find() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(new_user("test@test.com")).unwrap();
        assert_eq!(user.email, "test@test.com");
        assert!(repo.exists("test@test.com").unwrap());
        assert_eq!(repo.find("test@test.com").unwrap(), Some(user));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn shared_instance_sees_writes() {
        let repo = InMemoryUserRepository::shared();
        let other = Arc::clone(&repo);
        repo.create(new_user("a@test.com")).unwrap();
        assert!(other.exists("a@test.com").unwrap());
    }

    #[test]
    fn separate_instances_do_not_share() {
        let first = InMemoryUserRepository::new();
        let second = InMemoryUserRepository::new();
        first.create(new_user("a@test.com")).unwrap();
        assert!(!second.exists("a@test.com").unwrap());
    }

    #[test]
    fn errors_name_the_email() {
        let err = RepositoryError::Lookup {
            email: "x@test.com".into(),
            message: "poisoned".into(),
        };
        assert!(err.to_string().contains("x@test.com"));
    }
}
