//! Step and failure handler procedures.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::context::Options;
use super::error::StepFailure;

/// What a step or failure handler returns.
///
/// Steps with nothing to report return `Ok(Value::Null)`.
pub type StepResult = anyhow::Result<Value>;

type StepFn<P> = dyn Fn(&P, &mut Options) -> StepResult + Send + Sync;
type HandlerFn<P> = dyn Fn(&StepFailure, &P, &mut Options) -> StepResult + Send + Sync;

/// One unit of work in an operation.
///
/// A step reads the run's params, reads and writes the shared [`Options`],
/// and either returns a value or fails.
pub struct Step<P> {
    name: Option<String>,
    func: Arc<StepFn<P>>,
}

impl<P> Step<P> {
    /// Create a named step.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&P, &mut Options) -> StepResult + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            func: Arc::new(func),
        }
    }

    /// Create a step without a name.
    ///
    /// Logs and errors refer to it by position.
    pub fn anonymous<F>(func: F) -> Self
    where
        F: Fn(&P, &mut Options) -> StepResult + Send + Sync + 'static,
    {
        Self {
            name: None,
            func: Arc::new(func),
        }
    }

    /// The step's name, if it was given one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name used in logs and errors for the step at `position`.
    pub fn label(&self, position: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("step #{}", position),
        }
    }

    pub(crate) fn invoke(&self, params: &P, options: &mut Options) -> StepResult {
        (self.func)(params, options)
    }
}

impl<P> Clone for Step<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<P> fmt::Debug for Step<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Recovery procedure bound to one step position.
///
/// Returning `Ok` recovers: the value becomes the run's current result and
/// the run moves on to the next step. Returning `Err` ends the run.
pub struct FailureHandler<P> {
    func: Arc<HandlerFn<P>>,
}

impl<P> FailureHandler<P> {
    /// Create a failure handler.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&StepFailure, &P, &mut Options) -> StepResult + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    pub(crate) fn invoke(
        &self,
        failure: &StepFailure,
        params: &P,
        options: &mut Options,
    ) -> StepResult {
        (self.func)(failure, params, options)
    }
}

impl<P> Clone for FailureHandler<P> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<P> fmt::Debug for FailureHandler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureHandler").finish_non_exhaustive()
    }
}
