//! Engine error types.

use thiserror::Error;

/// Errors from the flow executor.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The flow's component graph failed the executor's pre-flight check
    /// (e.g. it contains a cycle that bypassed full validation).
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Execution terminated but the final component was not an End.
    #[error("unexpected termination at component {component_id:?}")]
    UnexpectedTermination {
        /// The component execution stopped at, if any.
        component_id: Option<String>,
    },

    /// A step raised an uncaught error, or the hard iteration cap was hit.
    #[error("execution error: {0}")]
    ExecutionError(String),

    /// Propagated from the execution context's state machine.
    #[error(transparent)]
    Context(#[from] nebula_execution::ExecutionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_graph_display() {
        let err = EngineError::InvalidGraph("cycle detected: a -> b -> a".into());
        assert!(err.to_string().contains("invalid graph"));
    }

    #[test]
    fn unexpected_termination_display() {
        let err = EngineError::UnexpectedTermination {
            component_id: Some("decision-1".into()),
        };
        assert!(err.to_string().contains("unexpected termination"));
    }

    #[test]
    fn execution_error_display() {
        let err = EngineError::ExecutionError("iteration cap exceeded".into());
        assert_eq!(err.to_string(), "execution error: iteration cap exceeded");
    }

    #[test]
    fn from_execution_error() {
        let inner = nebula_execution::ExecutionError::Cancelled;
        let err = EngineError::from(inner);
        assert_eq!(err.to_string(), "execution cancelled");
    }
}
