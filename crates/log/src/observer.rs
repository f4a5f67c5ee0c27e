//! The structured-logging [`Observer`] implementation this crate supplies.
//!
//! Metrics and span-based observers are contract-only — a caller wanting
//! those writes its own [`Observer`] against `nebula-execution`. This crate
//! ships exactly one: a `tracing`-event emitter.

use chrono::{DateTime, Utc};
use nebula_execution::{ExecutionContext, Observer};
use nebula_workflow::Component;

/// Emits one `tracing` event per lifecycle callback, with `flow_id`,
/// `execution_id`, and (where applicable) `component_id` as structured
/// fields.
///
/// Lifecycle milestones (`started`, `completed`) log at `info`; per-component
/// enter/exit and decision evaluation log at `debug`; failures and aborts log
/// at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    /// Construct a new observer. There is no configuration: format and
    /// level filtering belong to the installed subscriber, not the observer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Observer for TracingObserver {
    fn on_execution_started(&self, ctx: &ExecutionContext, timestamp: DateTime<Utc>) {
        tracing::info!(
            flow_id = %ctx.flow_id,
            execution_id = %ctx.execution_id,
            %timestamp,
            "execution started"
        );
    }

    fn on_component_enter(&self, component: &Component, ctx: &ExecutionContext, timestamp: DateTime<Utc>) {
        tracing::debug!(
            flow_id = %ctx.flow_id,
            execution_id = %ctx.execution_id,
            component_id = %component.id(),
            component_kind = component.kind_name(),
            %timestamp,
            "entering component"
        );
    }

    fn on_component_exit(
        &self,
        component: &Component,
        result: &str,
        ctx: &ExecutionContext,
        timestamp: DateTime<Utc>,
        duration_ms: u64,
    ) {
        tracing::debug!(
            flow_id = %ctx.flow_id,
            execution_id = %ctx.execution_id,
            component_id = %component.id(),
            component_kind = component.kind_name(),
            result,
            duration_ms,
            %timestamp,
            "exited component"
        );
    }

    fn on_context_changed(
        &self,
        _old: &ExecutionContext,
        new: &ExecutionContext,
        reason: &str,
        timestamp: DateTime<Utc>,
    ) {
        tracing::debug!(
            flow_id = %new.flow_id,
            execution_id = %new.execution_id,
            reason,
            %timestamp,
            "context changed"
        );
    }

    fn on_decision_evaluated(
        &self,
        component: &Component,
        condition_text: &str,
        chosen_branch_is_true: bool,
        ctx: &ExecutionContext,
        timestamp: DateTime<Utc>,
    ) {
        tracing::debug!(
            flow_id = %ctx.flow_id,
            execution_id = %ctx.execution_id,
            component_id = %component.id(),
            condition = condition_text,
            chosen_branch_is_true,
            %timestamp,
            "decision evaluated"
        );
    }

    fn on_execution_completed(&self, ctx: &ExecutionContext, timestamp: DateTime<Utc>) {
        tracing::info!(
            flow_id = %ctx.flow_id,
            execution_id = %ctx.execution_id,
            %timestamp,
            "execution completed"
        );
    }

    fn on_execution_failed(&self, ctx: &ExecutionContext, reason: &str, timestamp: DateTime<Utc>) {
        tracing::warn!(
            flow_id = %ctx.flow_id,
            execution_id = %ctx.execution_id,
            reason,
            %timestamp,
            "execution failed"
        );
    }

    fn on_execution_aborted(&self, ctx: &ExecutionContext, reason: &str, timestamp: DateTime<Utc>) {
        tracing::warn!(
            flow_id = %ctx.flow_id,
            execution_id = %ctx.execution_id,
            reason,
            %timestamp,
            "execution aborted"
        );
    }
}
