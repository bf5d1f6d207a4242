//! The run loop.
//!
//! Every call to [`Operation::run`](super::Operation::run) builds its own
//! [`Run`], which owns the cursor, the fresh [`Options`] and the current
//! result. Nothing here is shared between runs, so one operation can be run
//! from several threads at once.

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::context::Options;
use super::error::{OperationError, StepFailure};
use super::registry::{FailureRegistry, StepRegistry};

/// Lifecycle of a single run. Reported in the run's log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunState {
    /// Created, no step started yet.
    Idle,

    /// Stepping through positions.
    Running,

    /// All steps done without a terminal failure.
    Completed,

    /// A failure propagated out of the run.
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// How a step finished in a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step returned normally.
    Completed,

    /// The step failed and its failure handler recovered.
    Recovered,
}

impl StepOutcome {
    /// Get a display character for this outcome.
    pub fn display_char(&self) -> char {
        match self {
            StepOutcome::Completed => '✓',
            StepOutcome::Recovered => '↺',
        }
    }
}

/// Record of one executed step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// Position in the operation.
    pub position: usize,

    /// Step name (or positional label).
    pub name: String,

    /// How it finished.
    pub outcome: StepOutcome,

    /// Time spent in the step and, if any, its failure handler.
    pub duration: Duration,

    /// Error the step failed with before recovery.
    pub error: Option<String>,
}

/// Everything a completed run hands back.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Value of the last step or recovering handler. `Null` for no steps.
    pub result: Value,

    /// The run's context as the last step left it.
    pub options: Options,

    /// One record per executed step, in order.
    pub steps: Vec<StepRecord>,

    /// Wall time of the whole run.
    pub duration: Duration,
}

impl RunReport {
    /// Number of steps whose failure was recovered.
    pub fn recovered_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::Recovered)
            .count()
    }
}

/// State of one run in progress.
pub(crate) struct Run<'a, P> {
    steps: &'a StepRegistry<P>,
    failures: &'a FailureRegistry<P>,
    params: &'a P,
    cursor: usize,
    state: RunState,
    options: Options,
    result: Value,
    records: Vec<StepRecord>,
}

impl<'a, P> Run<'a, P> {
    pub(crate) fn new(
        steps: &'a StepRegistry<P>,
        failures: &'a FailureRegistry<P>,
        params: &'a P,
    ) -> Self {
        Self {
            steps,
            failures,
            params,
            cursor: 0,
            state: RunState::Idle,
            options: Options::new(),
            result: Value::Null,
            records: Vec::with_capacity(steps.len()),
        }
    }

    /// Drive the run to a terminal state.
    pub(crate) fn drive(mut self) -> Result<RunReport, OperationError> {
        let started = Instant::now();
        self.state = RunState::Running;
        debug!(steps = self.steps.len(), "run started");

        while let Some(step) = self.steps.get(self.cursor) {
            let position = self.cursor;
            let name = step.label(position);
            let step_started = Instant::now();
            debug!(position, step = %name, "step started");

            let (outcome, error) = match step.invoke(self.params, &mut self.options) {
                Ok(value) => {
                    self.result = value;
                    (StepOutcome::Completed, None)
                }
                Err(cause) => {
                    let failure = StepFailure::new(position, name.clone(), cause);
                    let message = failure.cause.to_string();
                    self.recover(failure)?;
                    (StepOutcome::Recovered, Some(message))
                }
            };

            debug!(position, step = %name, ?outcome, "step finished");
            self.records.push(StepRecord {
                position,
                name,
                outcome,
                duration: step_started.elapsed(),
                error,
            });
            self.cursor += 1;
        }

        self.state = RunState::Completed;
        debug!(state = %self.state, "run finished");

        Ok(RunReport {
            result: self.result,
            options: self.options,
            steps: self.records,
            duration: started.elapsed(),
        })
    }

    /// Dispatch a step failure to the handler at its position.
    fn recover(&mut self, failure: StepFailure) -> Result<(), OperationError> {
        warn!(
            position = failure.position,
            step = %failure.step,
            error = %failure.cause,
            "step failed"
        );

        let Some(handler) = self.failures.get(failure.position) else {
            self.state = RunState::Failed;
            error!(
                position = failure.position,
                step = %failure.step,
                state = %self.state,
                "no failure handler registered"
            );
            return Err(OperationError::Unhandled(failure));
        };

        match handler.invoke(&failure, self.params, &mut self.options) {
            Ok(value) => {
                info!(
                    position = failure.position,
                    step = %failure.step,
                    "step failure recovered"
                );
                self.result = value;
                Ok(())
            }
            Err(cause) => {
                self.state = RunState::Failed;
                error!(
                    position = failure.position,
                    step = %failure.step,
                    error = %cause,
                    state = %self.state,
                    "failure handler failed"
                );
                Err(OperationError::Recovery {
                    position: failure.position,
                    step: failure.step,
                    cause,
                })
            }
        }
    }
}
