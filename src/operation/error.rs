//! Failure types produced by the run loop.
//!
//! Steps and failure handlers fail with an [`anyhow::Error`], so any error
//! type can flow through the engine and be recovered later with
//! [`OperationError::downcast_ref`].
//!
//! Messages name the step only; the cause is reached through
//! [`std::error::Error::source`], so `{:#}` on an `anyhow::Error` prints it
//! once.

use std::fmt::{Debug, Display};

use thiserror::Error;

/// A failure raised by a step.
///
/// Passed to the failure handler registered at the same position. When no
/// handler is registered there, the run loop wraps it in
/// [`OperationError::Unhandled`].
#[derive(Debug, Error)]
#[error("step {position} ({step}) failed")]
pub struct StepFailure {
    /// Position of the failing step.
    pub position: usize,

    /// Name of the failing step.
    pub step: String,

    /// What the step failed with.
    #[source]
    pub cause: anyhow::Error,
}

impl StepFailure {
    /// Create a failure for the step at `position`.
    pub fn new(position: usize, step: impl Into<String>, cause: anyhow::Error) -> Self {
        Self {
            position,
            step: step.into(),
            cause,
        }
    }

    /// Borrow the cause as a concrete error type, if it is one.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        self.cause.downcast_ref::<E>()
    }
}

/// Terminal failure of a run.
#[derive(Debug, Error)]
pub enum OperationError {
    /// A step failed and no failure handler is registered at its position.
    #[error("no failure handler for step {} ({})", .0.position, .0.step)]
    Unhandled(#[source] StepFailure),

    /// The failure handler for a step failed itself.
    ///
    /// Supersedes the original step failure, which is not re-surfaced.
    #[error("failure handler for step {position} ({step}) failed")]
    Recovery {
        position: usize,
        step: String,
        #[source]
        cause: anyhow::Error,
    },
}

impl OperationError {
    /// Position of the step whose failure ended the run.
    pub fn position(&self) -> usize {
        match self {
            OperationError::Unhandled(failure) => failure.position,
            OperationError::Recovery { position, .. } => *position,
        }
    }

    /// Name of the step whose failure ended the run.
    pub fn step_name(&self) -> &str {
        match self {
            OperationError::Unhandled(failure) => &failure.step,
            OperationError::Recovery { step, .. } => step,
        }
    }

    /// The error that terminated the run.
    ///
    /// For [`OperationError::Unhandled`] this is the step's own error, for
    /// [`OperationError::Recovery`] it is the handler's error.
    pub fn cause(&self) -> &anyhow::Error {
        match self {
            OperationError::Unhandled(failure) => &failure.cause,
            OperationError::Recovery { cause, .. } => cause,
        }
    }

    /// Borrow the terminal cause as a concrete error type, if it is one.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        self.cause().downcast_ref::<E>()
    }

    /// Whether no failure handler was registered for the failing step.
    pub fn is_unhandled(&self) -> bool {
        matches!(self, OperationError::Unhandled(_))
    }

    /// Whether a failure handler ran and failed.
    pub fn is_recovery(&self) -> bool {
        matches!(self, OperationError::Recovery { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error, PartialEq)]
    #[error("disk full")]
    struct DiskFull;

    #[test]
    fn step_failure_displays_position_and_step() {
        let failure = StepFailure::new(2, "persist", anyhow::anyhow!("boom"));
        assert_eq!(failure.to_string(), "step 2 (persist) failed");
    }

    #[test]
    fn unhandled_identifies_failing_step() {
        let err = OperationError::Unhandled(StepFailure::new(1, "hash", DiskFull.into()));
        assert_eq!(err.to_string(), "no failure handler for step 1 (hash)");
        assert_eq!(err.position(), 1);
        assert_eq!(err.step_name(), "hash");
        assert!(err.is_unhandled());
        assert!(!err.is_recovery());
    }

    #[test]
    fn recovery_exposes_handler_cause() {
        let err = OperationError::Recovery {
            position: 0,
            step: "check".into(),
            cause: DiskFull.into(),
        };
        assert!(err.is_recovery());
        assert_eq!(err.downcast_ref::<DiskFull>(), Some(&DiskFull));
        assert!(err.to_string().contains("failure handler for step 0"));
    }

    #[test]
    fn unhandled_source_is_step_failure() {
        use std::error::Error as _;

        let err = OperationError::Unhandled(StepFailure::new(0, "a", DiskFull.into()));
        let source = err.source().expect("has source");
        assert!(source.to_string().contains("step 0 (a) failed"));
    }

    #[test]
    fn error_chain_prints_cause_once() {
        let err = anyhow::Error::new(OperationError::Unhandled(StepFailure::new(
            1,
            "bad",
            anyhow::anyhow!("broken pipe"),
        )));
        let chain = format!("{:#}", err);
        assert_eq!(
            chain,
            "no failure handler for step 1 (bad): step 1 (bad) failed: broken pipe"
        );
        assert_eq!(chain.matches("broken pipe").count(), 1);

        let err = anyhow::Error::new(OperationError::Recovery {
            position: 0,
            step: "check".into(),
            cause: DiskFull.into(),
        });
        assert_eq!(
            format!("{:#}", err),
            "failure handler for step 0 (check) failed: disk full"
        );
    }

    #[test]
    fn downcast_misses_other_types() {
        let failure = StepFailure::new(0, "a", anyhow::anyhow!("plain"));
        assert!(failure.downcast_ref::<DiskFull>().is_none());
    }
}
