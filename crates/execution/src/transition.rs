//! State machine transition validation for executions.

use crate::error::ExecutionError;
use crate::status::ExecutionStatus;

/// Returns `true` if the transition from `from` to `to` is valid.
#[must_use]
pub fn can_transition(from: ExecutionStatus, to: ExecutionStatus) -> bool {
    matches!(
        (from, to),
        (ExecutionStatus::NotStarted, ExecutionStatus::Running)
            | (ExecutionStatus::Running, ExecutionStatus::Paused)
            | (ExecutionStatus::Running, ExecutionStatus::Completed)
            | (ExecutionStatus::Running, ExecutionStatus::Failed)
            | (ExecutionStatus::Running, ExecutionStatus::Aborted)
            | (ExecutionStatus::Paused, ExecutionStatus::Running)
            | (ExecutionStatus::Paused, ExecutionStatus::Aborted)
    )
}

/// Validate a transition, returning an error if invalid.
pub fn validate_transition(from: ExecutionStatus, to: ExecutionStatus) -> Result<(), ExecutionError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(ExecutionError::invalid_transition(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        assert!(can_transition(
            ExecutionStatus::NotStarted,
            ExecutionStatus::Running
        ));
        assert!(can_transition(
            ExecutionStatus::Running,
            ExecutionStatus::Completed
        ));
        assert!(can_transition(
            ExecutionStatus::Running,
            ExecutionStatus::Failed
        ));
        assert!(can_transition(
            ExecutionStatus::Running,
            ExecutionStatus::Paused
        ));
        assert!(can_transition(
            ExecutionStatus::Paused,
            ExecutionStatus::Running
        ));
        assert!(can_transition(
            ExecutionStatus::Running,
            ExecutionStatus::Aborted
        ));
        assert!(can_transition(
            ExecutionStatus::Paused,
            ExecutionStatus::Aborted
        ));
    }

    #[test]
    fn invalid_transitions() {
        assert!(!can_transition(
            ExecutionStatus::NotStarted,
            ExecutionStatus::Completed
        ));
        assert!(!can_transition(
            ExecutionStatus::Completed,
            ExecutionStatus::Running
        ));
        assert!(!can_transition(
            ExecutionStatus::Aborted,
            ExecutionStatus::Running
        ));
        assert!(!can_transition(
            ExecutionStatus::NotStarted,
            ExecutionStatus::NotStarted
        ));
    }

    #[test]
    fn validate_transition_ok() {
        assert!(
            validate_transition(ExecutionStatus::NotStarted, ExecutionStatus::Running).is_ok()
        );
    }

    #[test]
    fn validate_transition_err() {
        let err = validate_transition(ExecutionStatus::Completed, ExecutionStatus::Running)
            .unwrap_err();
        assert!(err.to_string().contains("invalid transition"));
    }
}
