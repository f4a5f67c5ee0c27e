//! Execution error types.

use thiserror::Error;

use crate::status::ExecutionStatus;

/// Errors that can occur while driving an execution's state machine.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A state transition is not valid for the current status.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Attempted target status.
        to: String,
    },

    /// A component referenced by the execution context does not exist in
    /// the flow being executed.
    #[error("component not found: {0}")]
    ComponentNotFound(String),

    /// The execution was cancelled.
    #[error("execution cancelled")]
    Cancelled,
}

impl ExecutionError {
    /// Create an invalid-transition error from two statuses.
    #[must_use]
    pub fn invalid_transition(from: ExecutionStatus, to: ExecutionStatus) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Errors raised by the rollback engine when a caller asks for a point in
/// history that does not exist.
#[derive(Debug, Error)]
pub enum RollbackError {
    /// Fewer completed components exist than the requested number of steps.
    #[error("cannot roll back {requested} step(s): only {available} completed component(s) recorded")]
    InsufficientHistory {
        /// Steps requested.
        requested: usize,
        /// Completed components actually available.
        available: usize,
    },

    /// No `COMPONENT_COMPLETED` entry exists for the requested component.
    #[error("no completed entry found for component {component_id}")]
    TargetNotFound {
        /// The component that was never recorded as completed.
        component_id: String,
    },
}
