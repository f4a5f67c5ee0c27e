//! The immutable execution snapshot rethreaded through every step.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use nebula_value::VariableValue;
use nebula_workflow::ComponentId;

use crate::audit::AuditEntry;
use crate::status::ExecutionStatus;

/// One entry on the execution stack: a component that is currently
/// in progress, and when it was entered.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StackFrame {
    /// The component this frame tracks.
    pub component_id: ComponentId,
    /// The component's kind name (`"start"`, `"action"`, …), for display.
    pub component_type: String,
    /// When this frame was pushed.
    pub entered_at: DateTime<Utc>,
}

impl StackFrame {
    /// Build a new frame stamped with the current time.
    #[must_use]
    pub fn new(component_id: ComponentId, component_type: impl Into<String>) -> Self {
        Self {
            component_id,
            component_type: component_type.into(),
            entered_at: Utc::now(),
        }
    }
}

/// An immutable snapshot of everything needed to resume an execution.
///
/// Every mutation on this type returns a new value — nothing here is ever
/// mutated in place. The audit trail is the substrate [`crate::rollback`]
/// rewinds against.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionContext {
    /// The flow this execution is running.
    pub flow_id: String,
    /// Unique identifier for this particular run of the flow.
    pub execution_id: String,
    /// The component about to execute, or `None` once execution is complete.
    pub current_component_id: Option<ComponentId>,
    /// Variable bindings visible to the current component.
    pub variables: IndexMap<String, VariableValue>,
    /// Components currently in progress, most recently entered last.
    pub execution_stack: Vec<StackFrame>,
    /// Append-only history of everything that has happened so far.
    pub audit_trail: Vec<AuditEntry>,
    /// The execution's lifecycle state.
    pub status: ExecutionStatus,
    /// Opaque caller-supplied metadata, carried through unchanged.
    pub metadata: IndexMap<String, serde_json::Value>,
}

impl ExecutionContext {
    /// Seed a fresh context for a new run: no variables, no stack, no audit
    /// trail, status [`ExecutionStatus::NotStarted`].
    #[must_use]
    pub fn new(
        flow_id: impl Into<String>,
        execution_id: impl Into<String>,
        start_component_id: ComponentId,
    ) -> Self {
        Self {
            flow_id: flow_id.into(),
            execution_id: execution_id.into(),
            current_component_id: Some(start_component_id),
            variables: IndexMap::new(),
            execution_stack: Vec::new(),
            audit_trail: Vec::new(),
            status: ExecutionStatus::NotStarted,
            metadata: IndexMap::new(),
        }
    }

    /// Return a copy with `status` replaced.
    #[must_use]
    pub fn with_status(&self, status: ExecutionStatus) -> Self {
        let mut next = self.clone();
        next.status = status;
        next
    }

    /// Return a copy with `current_component_id` replaced.
    #[must_use]
    pub fn with_current_component(&self, component_id: Option<ComponentId>) -> Self {
        let mut next = self.clone();
        next.current_component_id = component_id;
        next
    }

    /// Return a copy with one variable bound (inserted or overwritten).
    #[must_use]
    pub fn with_variable(&self, name: impl Into<String>, value: VariableValue) -> Self {
        let mut next = self.clone();
        next.variables.insert(name.into(), value);
        next
    }

    /// Return a copy with `audit_trail` extended by one entry.
    #[must_use]
    pub fn with_audit_entry(&self, entry: AuditEntry) -> Self {
        let mut next = self.clone();
        next.audit_trail.push(entry);
        next
    }

    /// Return a copy with a stack frame pushed.
    #[must_use]
    pub fn with_frame_pushed(&self, frame: StackFrame) -> Self {
        let mut next = self.clone();
        next.execution_stack.push(frame);
        next
    }

    /// Return a copy with the top stack frame popped, if any.
    #[must_use]
    pub fn with_frame_popped(&self) -> Self {
        let mut next = self.clone();
        next.execution_stack.pop();
        next
    }

    /// Count of [`crate::audit::AuditAction::ComponentCompleted`] entries
    /// recorded so far.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        use crate::audit::AuditAction;
        self.audit_trail
            .iter()
            .filter(|e| e.action == AuditAction::ComponentCompleted)
            .count()
    }
}
