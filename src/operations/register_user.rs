//! Register a user.
//!
//! check exists → hash password → persist → send welcome email → finalize.
//! Each of the first four steps has a failure handler that turns whatever
//! went wrong into a [`RegistrationError`] and ends the run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::operation::{FailureHandler, Operation, Options, StepResult};
use crate::services::{hash_password, NewUser, Notifier, User, UserRepository};

/// Position of the duplicate check.
pub const CHECK_USER_EXISTS: usize = 0;
/// Position of password hashing.
pub const HASH_PASSWORD: usize = 1;
/// Position of the repository write.
pub const CREATE_USER: usize = 2;
/// Position of the welcome email.
pub const SEND_EMAIL: usize = 3;

/// Options key for the hashed password.
pub const HASHED_PASSWORD_KEY: &str = "hashedPassword";
/// Options key for the stored user.
pub const USER_KEY: &str = "user";
/// Options key for the delivery receipt.
pub const EMAIL_SENT_KEY: &str = "emailSent";

/// Input of a registration run.
#[derive(Clone)]
pub struct RegistrationParams {
    pub email: String,
    pub password: String,
    pub users: Arc<dyn UserRepository>,
    pub notifier: Arc<dyn Notifier>,
}

/// Why a registration failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("user with email {email} already exists")]
    AlreadyExists { email: String },

    #[error("error checking the repository for {email}")]
    LookupFailed { email: String },

    #[error("could not hash the password")]
    HashFailed,

    #[error("error saving record {record}")]
    PersistFailed { record: String },

    #[error("error sending email to {email}")]
    DeliveryFailed { email: String },
}

/// Value returned by a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub user: User,
    #[serde(rename = "emailSent")]
    pub email_sent: String,
}

impl Registration {
    /// Decode the run result of [`register_user`].
    pub fn from_result(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// Build the register-user operation.
pub fn register_user() -> Operation<RegistrationParams> {
    let mut op: Operation<RegistrationParams> = Operation::new("register_user");

    op.step("check_user_exists", check_user_exists);
    op.register_failure(
        CHECK_USER_EXISTS,
        FailureHandler::<RegistrationParams>::new(|failure, params, _| {
            let escalated = match failure.downcast_ref::<RegistrationError>() {
                Some(err @ RegistrationError::AlreadyExists { .. }) => err.clone(),
                _ => RegistrationError::LookupFailed {
                    email: params.email.clone(),
                },
            };
            Err(escalated.into())
        }),
    );

    op.step("hash_password", hash_user_password);
    op.register_failure(
        HASH_PASSWORD,
        FailureHandler::<RegistrationParams>::new(|_, _, _| {
            Err(RegistrationError::HashFailed.into())
        }),
    );

    op.step("create_user", create_user);
    op.register_failure(
        CREATE_USER,
        FailureHandler::<RegistrationParams>::new(|_, params, _| {
            Err(RegistrationError::PersistFailed {
                record: format!("with email {}", params.email),
            }
            .into())
        }),
    );

    op.step("send_email", send_email);
    op.register_failure(
        SEND_EMAIL,
        FailureHandler::<RegistrationParams>::new(|_, params, _| {
            Err(RegistrationError::DeliveryFailed {
                email: params.email.clone(),
            }
            .into())
        }),
    );

    op.step("finalize", finalize);
    op
}

fn check_user_exists(params: &RegistrationParams, _: &mut Options) -> StepResult {
    if params.users.exists(&params.email)? {
        return Err(RegistrationError::AlreadyExists {
            email: params.email.clone(),
        }
        .into());
    }
    Ok(Value::Null)
}

fn hash_user_password(params: &RegistrationParams, options: &mut Options) -> StepResult {
    if params.password.is_empty() {
        anyhow::bail!("password is empty");
    }
    options.insert(
        HASHED_PASSWORD_KEY,
        hash_password(&params.email, &params.password),
    );
    Ok(Value::Null)
}

fn create_user(params: &RegistrationParams, options: &mut Options) -> StepResult {
    let password = options
        .get_str(HASHED_PASSWORD_KEY)
        .ok_or_else(|| anyhow::anyhow!("no hashed password in context"))?
        .to_string();
    let user = params.users.create(NewUser {
        email: params.email.clone(),
        password,
    })?;
    options.insert_as(USER_KEY, &user)?;
    Ok(Value::Null)
}

fn send_email(params: &RegistrationParams, options: &mut Options) -> StepResult {
    let receipt = params.notifier.send_to(&params.email)?;
    options.insert(EMAIL_SENT_KEY, receipt);
    Ok(Value::Null)
}

fn finalize(_: &RegistrationParams, options: &mut Options) -> StepResult {
    Ok(json!({
        USER_KEY: options.get(USER_KEY),
        EMAIL_SENT_KEY: options.get(EMAIL_SENT_KEY),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ConsoleMailer, InMemoryUserRepository, NotifierError, RepositoryError};

    struct BrokenRepository;

    impl UserRepository for BrokenRepository {
        fn exists(&self, email: &str) -> Result<bool, RepositoryError> {
            Err(RepositoryError::Lookup {
                email: email.to_string(),
                message: "connection refused".into(),
            })
        }

        fn find(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            self.exists(email).map(|_| None)
        }

        fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
            Err(RepositoryError::Write {
                email: user.email,
                message: "read only".into(),
            })
        }
    }

    struct ReadOnlyRepository;

    impl UserRepository for ReadOnlyRepository {
        fn exists(&self, _: &str) -> Result<bool, RepositoryError> {
            Ok(false)
        }

        fn find(&self, _: &str) -> Result<Option<User>, RepositoryError> {
            Ok(None)
        }

        fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
            Err(RepositoryError::Write {
                email: user.email,
                message: "read only".into(),
            })
        }
    }

    struct DeadMailer;

    impl Notifier for DeadMailer {
        fn send_to(&self, target: &str) -> Result<String, NotifierError> {
            Err(NotifierError {
                target: target.to_string(),
                message: "smtp down".into(),
            })
        }
    }

    fn params(users: Arc<dyn UserRepository>, notifier: Arc<dyn Notifier>) -> RegistrationParams {
        RegistrationParams {
            email: "test@test.com".into(),
            password: "security".into(),
            users,
            notifier,
        }
    }

    fn working() -> RegistrationParams {
        params(
            InMemoryUserRepository::shared(),
            Arc::new(ConsoleMailer::new()),
        )
    }

    #[test]
    fn handlers_guard_first_four_steps() {
        let op = register_user();
        assert_eq!(op.steps().len(), 5);
        assert_eq!(
            op.failures().positions(),
            vec![CHECK_USER_EXISTS, HASH_PASSWORD, CREATE_USER, SEND_EMAIL]
        );
    }

    #[test]
    fn successful_registration_returns_user_and_receipt() {
        let result = register_user().run(&working()).unwrap();
        let registration = Registration::from_result(result).unwrap();
        assert_eq!(registration.user.email, "test@test.com");
        assert_ne!(registration.user.password, "security");
        assert!(registration.email_sent.contains("test@test.com"));
    }

    #[test]
    fn lookup_error_escalates_to_lookup_failed() {
        let p = params(Arc::new(BrokenRepository), Arc::new(ConsoleMailer::new()));
        let err = register_user().run(&p).unwrap_err();
        assert!(err.is_recovery());
        assert_eq!(err.position(), CHECK_USER_EXISTS);
        assert_eq!(
            err.downcast_ref::<RegistrationError>(),
            Some(&RegistrationError::LookupFailed {
                email: "test@test.com".into()
            })
        );
    }

    #[test]
    fn empty_password_escalates_to_hash_failed() {
        let mut p = working();
        p.password.clear();
        let err = register_user().run(&p).unwrap_err();
        assert_eq!(err.position(), HASH_PASSWORD);
        assert_eq!(
            err.downcast_ref::<RegistrationError>(),
            Some(&RegistrationError::HashFailed)
        );
    }

    #[test]
    fn write_error_escalates_to_persist_failed() {
        let p = params(Arc::new(ReadOnlyRepository), Arc::new(ConsoleMailer::new()));
        let err = register_user().run(&p).unwrap_err();
        assert_eq!(err.position(), CREATE_USER);
        assert_eq!(
            err.downcast_ref::<RegistrationError>(),
            Some(&RegistrationError::PersistFailed {
                record: "with email test@test.com".into()
            })
        );
    }

    #[test]
    fn delivery_error_escalates_but_user_is_already_stored() {
        let users = InMemoryUserRepository::shared();
        let p = params(users.clone(), Arc::new(DeadMailer));
        let err = register_user().run(&p).unwrap_err();
        assert_eq!(err.position(), SEND_EMAIL);
        assert_eq!(
            err.downcast_ref::<RegistrationError>(),
            Some(&RegistrationError::DeliveryFailed {
                email: "test@test.com".into()
            })
        );
        assert!(users.exists("test@test.com").unwrap());
    }

    #[test]
    fn error_messages_carry_fields() {
        let err = RegistrationError::AlreadyExists {
            email: "a@test.com".into(),
        };
        assert_eq!(err.to_string(), "user with email a@test.com already exists");
    }
}
