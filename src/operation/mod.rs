//! The sequential operation engine.
//!
//! An [`Operation`] is an ordered list of [`Step`]s plus [`FailureHandler`]s
//! bound to step positions. Running it walks the steps in order, threading a
//! fresh [`Options`] context through every call:
//!
//! - a step that returns `Ok` sets the run's result;
//! - a step that fails is handed to the handler registered at its exact
//!   position, which either recovers (the run continues with the next step,
//!   the failed step is not re-run) or fails (the run ends with
//!   [`OperationError::Recovery`]);
//! - a failing step with no handler ends the run with
//!   [`OperationError::Unhandled`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use stepline::operation::Operation;
//!
//! let mut op: Operation<String> = Operation::new("greet");
//! op.step("build", |name, options| {
//!     options.insert("greeting", format!("hello {}", name));
//!     Ok(json!(null))
//! });
//! op.step("shout", |_, options| {
//!     let greeting = options.get_str("greeting").unwrap_or_default().to_uppercase();
//!     Ok(json!(greeting))
//! });
//!
//! let result = op.run(&"ada".to_string()).unwrap();
//! assert_eq!(result, json!("HELLO ADA"));
//! ```

pub mod context;
pub mod error;
pub mod registry;
pub mod runner;
pub mod step;

pub use context::Options;
pub use error::{OperationError, StepFailure};
pub use registry::{FailureRegistry, StepRegistry};
pub use runner::{RunReport, StepOutcome, StepRecord};
pub use step::{FailureHandler, Step, StepResult};

use serde_json::Value;
use tracing::info_span;

use runner::Run;

/// A named, reusable sequence of steps with positional failure handlers.
///
/// Configure it once, then run it any number of times. Runs borrow the
/// operation immutably and share nothing with each other.
#[derive(Debug)]
pub struct Operation<P> {
    name: String,
    steps: StepRegistry<P>,
    failures: FailureRegistry<P>,
}

impl<P> Operation<P> {
    /// Create an operation with no steps.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: StepRegistry::new(),
            failures: FailureRegistry::new(),
        }
    }

    /// The operation's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a named step built from a closure, returning its position.
    pub fn step<F>(&mut self, name: impl Into<String>, func: F) -> usize
    where
        F: Fn(&P, &mut Options) -> StepResult + Send + Sync + 'static,
    {
        self.register_step(Step::new(name, func))
    }

    /// Append one step, returning its position.
    pub fn register_step(&mut self, step: Step<P>) -> usize {
        self.steps.append(step)
    }

    /// Append several steps, preserving their order.
    pub fn register_steps(&mut self, steps: impl IntoIterator<Item = Step<P>>) {
        self.steps.append_all(steps);
    }

    /// Bind a failure handler to the step at `position`.
    ///
    /// A handler already bound there is replaced.
    pub fn register_failure(&mut self, position: usize, handler: FailureHandler<P>) {
        self.failures.register(position, handler);
    }

    /// Bind several failure handlers. Later entries win on duplicate positions.
    pub fn register_failures(
        &mut self,
        handlers: impl IntoIterator<Item = (usize, FailureHandler<P>)>,
    ) {
        self.failures.register_all(handlers);
    }

    /// Bind a failure handler to the most recently registered step.
    ///
    /// With no steps registered yet the handler guards position 0. Returns
    /// the position it was bound to.
    pub fn on_failure<F>(&mut self, func: F) -> usize
    where
        F: Fn(&StepFailure, &P, &mut Options) -> StepResult + Send + Sync + 'static,
    {
        let position = self.steps.len().saturating_sub(1);
        self.register_failure(position, FailureHandler::new(func));
        position
    }

    /// Registered steps in execution order.
    pub fn steps(&self) -> &[Step<P>] {
        self.steps.list()
    }

    /// Replace every step.
    pub fn set_steps(&mut self, steps: Vec<Step<P>>) {
        self.steps.replace(steps);
    }

    /// Registered failure handlers, ordered by position.
    pub fn failures(&self) -> &FailureRegistry<P> {
        &self.failures
    }

    /// Replace every failure handler.
    pub fn set_failures(&mut self, handlers: impl IntoIterator<Item = (usize, FailureHandler<P>)>) {
        self.failures.replace(handlers);
    }

    /// Run every step and return the last produced value.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Unhandled`] when a step fails with no
    /// handler at its position, and [`OperationError::Recovery`] when that
    /// handler fails.
    pub fn run(&self, params: &P) -> Result<Value, OperationError> {
        self.execute(params).map(|report| report.result)
    }

    /// Run every step and return the full [`RunReport`], including the
    /// final context.
    ///
    /// # Errors
    ///
    /// Same as [`Operation::run`].
    pub fn execute(&self, params: &P) -> Result<RunReport, OperationError> {
        let span = info_span!("operation", name = %self.name);
        let _enter = span.enter();
        Run::new(&self.steps, &self.failures, params).drive()
    }
}

impl<P> Clone for Operation<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            steps: self.steps.clone(),
            failures: self.failures.clone(),
        }
    }
}
