//! Execution-level status tracking.

use serde::{Deserialize, Serialize};

/// The overall status of a flow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Context created, no component has run yet.
    NotStarted,
    /// Actively stepping through components.
    Running,
    /// Suspended at a breakpoint, awaiting resume.
    Paused,
    /// Execution reached an End component successfully.
    Completed,
    /// A component raised an error the executor did not recover from.
    Failed,
    /// Execution was cancelled before reaching a terminal component.
    Aborted,
}

impl ExecutionStatus {
    /// Returns `true` if the execution has reached a final state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Aborted)
    }

    /// Returns `true` if the execution is currently making progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::NotStarted | Self::Running | Self::Paused)
    }

    /// Returns `true` if the execution completed successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns `true` if the execution ended in a failure state.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Aborted)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}
