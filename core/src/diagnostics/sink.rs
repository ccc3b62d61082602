use core::ops::ControlFlow;

/// How a pass reacts to the errors it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalPolicy {
    /// Record the first blocking error and stop the pass.
    StopOnFirstError,
    /// Record every error and keep walking.
    CollectAll,
}

/// Ordered error accumulator governed by a [`TraversalPolicy`].
///
/// Passes call [`ErrorSink::report`] and honour the returned
/// [`ControlFlow`]: `Break` means the pass must stop consuming input.
#[derive(Debug)]
pub struct ErrorSink<E> {
    policy: TraversalPolicy,
    errors: Vec<E>,
}

impl<E> ErrorSink<E> {
    pub fn new(policy: TraversalPolicy) -> Self {
        Self {
            policy,
            errors: Vec::new(),
        }
    }

    pub fn report(&mut self, error: E) -> ControlFlow<()> {
        self.errors.push(error);
        match self.policy {
            TraversalPolicy::StopOnFirstError => ControlFlow::Break(()),
            TraversalPolicy::CollectAll => ControlFlow::Continue(()),
        }
    }

    pub fn into_errors(self) -> Vec<E> {
        self.errors
    }
}
