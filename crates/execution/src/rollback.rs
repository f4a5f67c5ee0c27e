//! Rewinding an [`ExecutionContext`] to an earlier completed component.

use chrono::{DateTime, Utc};
use nebula_workflow::ComponentId;

use crate::audit::{AuditAction, AuditEntry};
use crate::context::ExecutionContext;
use crate::status::ExecutionStatus;

/// One point an execution can be rewound to.
#[derive(Debug, Clone, PartialEq)]
pub struct RollbackPoint {
    /// The component that completed at this point.
    pub component_id: ComponentId,
    /// This entry's position in the audit trail.
    pub audit_index: usize,
    /// When the component completed.
    pub timestamp: DateTime<Utc>,
}

/// `true` iff the audit trail contains at least `steps`
/// [`AuditAction::ComponentCompleted`] entries.
#[must_use]
pub fn can_rollback(ctx: &ExecutionContext, steps: usize) -> bool {
    steps > 0 && ctx.completed_count() >= steps
}

/// Rewind `ctx` by `steps` completed components, or `None` if there
/// aren't that many.
#[must_use]
pub fn rollback(ctx: &ExecutionContext, steps: usize) -> Option<ExecutionContext> {
    if !can_rollback(ctx, steps) {
        return None;
    }
    let completed_count = ctx.completed_count();
    if steps == completed_count {
        // Rewinding this far lands before the first completed component;
        // there is no entry left to rewind to.
        return None;
    }
    let target_ordinal = completed_count - steps - 1;
    let target_index = completed_indices(ctx).nth(target_ordinal)?;
    Some(rewind_to_index(ctx, target_index))
}

/// Rewind `ctx` to the most recent [`AuditAction::ComponentCompleted`]
/// entry for `component_id`, or `None` if there is none.
#[must_use]
pub fn rollback_to(ctx: &ExecutionContext, component_id: &ComponentId) -> Option<ExecutionContext> {
    let target_index = completed_indices(ctx)
        .filter(|&i| &ctx.audit_trail[i].component_id == component_id)
        .next_back()?;
    Some(rewind_to_index(ctx, target_index))
}

/// Every point `ctx` could currently be rewound to, oldest first.
#[must_use]
pub fn available_rollback_points(ctx: &ExecutionContext) -> Vec<RollbackPoint> {
    completed_indices(ctx)
        .map(|i| {
            let entry = &ctx.audit_trail[i];
            RollbackPoint {
                component_id: entry.component_id.clone(),
                audit_index: i,
                timestamp: entry.timestamp,
            }
        })
        .collect()
}

fn completed_indices(ctx: &ExecutionContext) -> impl DoubleEndedIterator<Item = usize> + '_ {
    ctx.audit_trail
        .iter()
        .enumerate()
        .filter(|(_, e)| e.action == AuditAction::ComponentCompleted)
        .map(|(i, _)| i)
}

fn rewind_to_index(ctx: &ExecutionContext, target_index: usize) -> ExecutionContext {
    let target = &ctx.audit_trail[target_index];
    let component_id = target.component_id.clone();
    let variables = target.context_snapshot.clone();

    let mut audit_trail: Vec<AuditEntry> = ctx.audit_trail[..=target_index].to_vec();
    audit_trail.push(AuditEntry::new(
        component_id.clone(),
        AuditAction::ComponentStarted,
        format!("rolled back to {component_id}"),
        variables.clone(),
    ));

    ExecutionContext {
        flow_id: ctx.flow_id.clone(),
        execution_id: ctx.execution_id.clone(),
        current_component_id: Some(component_id),
        variables,
        execution_stack: Vec::new(),
        audit_trail,
        status: ExecutionStatus::Running,
        metadata: ctx.metadata.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn completed(ctx: &ExecutionContext, id: &str, vars: IndexMap<String, nebula_value::VariableValue>) -> ExecutionContext {
        ctx.with_audit_entry(AuditEntry::new(
            ComponentId::new(id),
            AuditAction::ComponentStarted,
            "start",
            vars.clone(),
        ))
        .with_audit_entry(AuditEntry::new(
            ComponentId::new(id),
            AuditAction::ComponentCompleted,
            "done",
            vars,
        ))
    }

    fn built_trail() -> ExecutionContext {
        let mut vars1 = IndexMap::new();
        vars1.insert("x".to_string(), nebula_value::VariableValue::Number(1.0));
        let mut vars2 = IndexMap::new();
        vars2.insert("x".to_string(), nebula_value::VariableValue::Number(2.0));

        let ctx = ExecutionContext::new("flow-1", "exec-1", ComponentId::new("start"));
        let ctx = completed(&ctx, "a1", vars1);
        completed(&ctx, "a2", vars2)
    }

    #[test]
    fn can_rollback_respects_completed_count() {
        let ctx = built_trail();
        assert!(can_rollback(&ctx, 1));
        assert!(can_rollback(&ctx, 2));
        assert!(!can_rollback(&ctx, 3));
        assert!(!can_rollback(&ctx, 0));
    }

    #[test]
    fn rollback_one_step_restores_prior_snapshot() {
        let ctx = built_trail();
        let rolled = rollback(&ctx, 1).expect("rollback should succeed");
        assert_eq!(rolled.current_component_id, Some(ComponentId::new("a1")));
        assert_eq!(
            rolled.variables.get("x"),
            Some(&nebula_value::VariableValue::Number(1.0))
        );
        assert_eq!(rolled.status, ExecutionStatus::Running);
        assert!(rolled.execution_stack.is_empty());
    }

    #[test]
    fn rollback_beyond_history_returns_none() {
        let ctx = built_trail();
        assert!(rollback(&ctx, 5).is_none());
    }

    #[test]
    fn rollback_to_finds_most_recent_completion() {
        let ctx = built_trail();
        let rolled = rollback_to(&ctx, &ComponentId::new("a1")).expect("should find a1");
        assert_eq!(rolled.current_component_id, Some(ComponentId::new("a1")));
    }

    #[test]
    fn rollback_to_unknown_component_returns_none() {
        let ctx = built_trail();
        assert!(rollback_to(&ctx, &ComponentId::new("nope")).is_none());
    }

    #[test]
    fn available_rollback_points_lists_each_completion() {
        let ctx = built_trail();
        let points = available_rollback_points(&ctx);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].component_id, ComponentId::new("a1"));
        assert_eq!(points[1].component_id, ComponentId::new("a2"));
    }

    #[test]
    fn original_context_is_never_mutated() {
        let ctx = built_trail();
        let before = ctx.clone();
        let _ = rollback(&ctx, 1);
        assert_eq!(ctx, before);
    }
}
