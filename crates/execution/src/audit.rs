//! The append-only audit trail that makes rollback possible.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use nebula_value::VariableValue;
use nebula_workflow::ComponentId;

/// What happened to produce an [`AuditEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A component began executing.
    ComponentStarted,
    /// A component finished executing successfully.
    ComponentCompleted,
    /// A component raised an error.
    ComponentFailed,
    /// A variable binding changed.
    VariableUpdated,
    /// The context changed for a reason other than a variable binding.
    ContextChanged,
}

/// A single event in an execution's audit trail.
///
/// `context_snapshot` is the variable mapping *at entry time* for the
/// component this entry describes — the substrate [`crate::rollback`] rewinds
/// to.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AuditEntry {
    /// When this entry was recorded.
    pub timestamp: DateTime<Utc>,
    /// The component this entry describes.
    pub component_id: ComponentId,
    /// What happened.
    pub action: AuditAction,
    /// A human-readable description.
    pub message: String,
    /// The variable mapping at the time this entry was recorded.
    pub context_snapshot: IndexMap<String, VariableValue>,
}

impl AuditEntry {
    /// Build a new audit entry stamped with the current time.
    #[must_use]
    pub fn new(
        component_id: ComponentId,
        action: AuditAction,
        message: impl Into<String>,
        context_snapshot: IndexMap<String, VariableValue>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            component_id,
            action,
            message: message.into(),
            context_snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_rename_snake_case() {
        let json = serde_json::to_string(&AuditAction::ComponentStarted).unwrap();
        assert_eq!(json, "\"component_started\"");
        let json = serde_json::to_string(&AuditAction::VariableUpdated).unwrap();
        assert_eq!(json, "\"variable_updated\"");
    }

    #[test]
    fn entry_roundtrip() {
        let entry = AuditEntry::new(
            ComponentId::new("start"),
            AuditAction::ComponentStarted,
            "beginning execution of demo",
            IndexMap::new(),
        );
        let json = serde_json::to_string(&entry).unwrap();
        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.component_id, entry.component_id);
        assert_eq!(back.action, entry.action);
        assert_eq!(back.message, entry.message);
    }
}
