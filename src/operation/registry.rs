//! Step and failure registries.
//!
//! Both are plain bookkeeping: registration never fails and positions are
//! never reordered.

use std::collections::BTreeMap;

use super::step::{FailureHandler, Step};

/// Ordered list of steps. Position is execution order.
#[derive(Debug)]
pub struct StepRegistry<P> {
    steps: Vec<Step<P>>,
}

impl<P> StepRegistry<P> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step, returning its 0-based position.
    pub fn append(&mut self, step: Step<P>) -> usize {
        self.steps.push(step);
        self.steps.len() - 1
    }

    /// Append steps in iteration order.
    pub fn append_all(&mut self, steps: impl IntoIterator<Item = Step<P>>) {
        self.steps.extend(steps);
    }

    /// Registered steps in execution order.
    pub fn list(&self) -> &[Step<P>] {
        &self.steps
    }

    /// Replace every registered step.
    pub fn replace(&mut self, steps: Vec<Step<P>>) {
        self.steps = steps;
    }

    /// Step at `position`.
    pub fn get(&self, position: usize) -> Option<&Step<P>> {
        self.steps.get(position)
    }

    /// Number of registered steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no steps are registered.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<P> Default for StepRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for StepRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
        }
    }
}

/// Failure handlers keyed by the position of the step they guard.
///
/// One handler per position; registering again at a position replaces the
/// earlier handler.
#[derive(Debug)]
pub struct FailureRegistry<P> {
    handlers: BTreeMap<usize, FailureHandler<P>>,
}

impl<P> FailureRegistry<P> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Bind `handler` to `position`, returning the handler it replaced.
    pub fn register(
        &mut self,
        position: usize,
        handler: FailureHandler<P>,
    ) -> Option<FailureHandler<P>> {
        self.handlers.insert(position, handler)
    }

    /// Bind many handlers. Later entries win on duplicate positions.
    pub fn register_all(&mut self, handlers: impl IntoIterator<Item = (usize, FailureHandler<P>)>) {
        self.handlers.extend(handlers);
    }

    /// Handler bound to exactly `position`.
    pub fn get(&self, position: usize) -> Option<&FailureHandler<P>> {
        self.handlers.get(&position)
    }

    /// Registered handlers ordered by position.
    pub fn list(&self) -> impl Iterator<Item = (usize, &FailureHandler<P>)> {
        self.handlers
            .iter()
            .map(|(position, handler)| (*position, handler))
    }

    /// Positions that have a handler, ascending.
    pub fn positions(&self) -> Vec<usize> {
        self.handlers.keys().copied().collect()
    }

    /// Replace every registered handler.
    pub fn replace(&mut self, handlers: impl IntoIterator<Item = (usize, FailureHandler<P>)>) {
        self.handlers = handlers.into_iter().collect();
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<P> Default for FailureRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for FailureRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}
