//! Drives a [`Flow`] through its components, stepping the immutable
//! [`ExecutionContext`] forward one component at a time.

use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use indexmap::IndexMap;
use nebula_core::ExecutionId;
use nebula_execution::{
    AuditAction, AuditEntry, CompositeObserver, ExecutionContext, ExecutionStatus, NoopObserver,
    Observer, StackFrame,
};
use nebula_value::VariableValue;
use nebula_workflow::{graph, Component, ComponentId, Flow, PortDirection};
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::registry::HostServiceRegistry;

/// The hard last-resort bound on how many components a single
/// `RUN_TO_COMPLETION` execution may step through.
pub const DEFAULT_ITERATION_CAP: usize = 10_000;

/// How `execute` should drive the flow forward.
#[derive(Debug, Clone)]
pub enum ExecutionMode {
    /// Step until an End component is reached or the iteration cap is hit.
    RunToCompletion,
    /// Execute exactly one step, then return.
    StepByStep,
    /// Step until an End is reached, or the next component to enter is in
    /// `breakpoints`, whichever comes first.
    RunToBreakpoint(HashSet<ComponentId>),
}

/// The result of a single [`Executor::step`] call.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// The context after this step.
    pub context: ExecutionContext,
    /// `true` once the flow has no further successor to advance to.
    pub is_complete: bool,
    /// Set if the step raised an error.
    pub error: Option<String>,
}

/// The result of an [`Executor::abort`] call.
#[derive(Debug, Clone)]
pub struct AbortResult {
    /// The context after aborting.
    pub context: ExecutionContext,
    /// Why the execution was aborted.
    pub reason: String,
}

/// Summary counters attached to a completed [`ExecutionResult`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionMetrics {
    /// Count of `COMPONENT_COMPLETED` audit entries.
    pub components_executed: usize,
    /// Total wall-clock time spent in `execute`.
    pub duration_ms: u64,
}

/// The outcome of a completed [`Executor::execute`] call.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// The final context.
    pub context: ExecutionContext,
    /// Variable bindings at the end of the run, on success.
    pub output_variables: IndexMap<String, VariableValue>,
    /// Execution counters.
    pub metrics: ExecutionMetrics,
    /// Set when the run did not end in [`ExecutionStatus::Completed`].
    pub error: Option<String>,
}

impl ExecutionResult {
    fn success(context: ExecutionContext, duration_ms: u64) -> Self {
        let components_executed = context.completed_count();
        Self {
            output_variables: context.variables.clone(),
            metrics: ExecutionMetrics {
                components_executed,
                duration_ms,
            },
            error: None,
            context,
        }
    }

    fn failure(context: ExecutionContext, duration_ms: u64, error: impl Into<String>) -> Self {
        let components_executed = context.completed_count();
        Self {
            output_variables: context.variables.clone(),
            metrics: ExecutionMetrics {
                components_executed,
                duration_ms,
            },
            error: Some(error.into()),
            context,
        }
    }

    /// `true` iff this run ended with `status == Completed`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.context.status == ExecutionStatus::Completed
    }
}

/// Steps a [`Flow`] forward against a [`HostServiceRegistry`], notifying an
/// [`Observer`] along the way.
pub struct Executor {
    registry: HostServiceRegistry,
    observer: Arc<dyn Observer>,
    iteration_cap: usize,
    cancellation_token: Option<CancellationToken>,
}

impl Executor {
    /// Build an executor with the default no-op observer and the default
    /// iteration cap.
    #[must_use]
    pub fn new(registry: HostServiceRegistry) -> Self {
        Self {
            registry,
            observer: Arc::new(NoopObserver),
            iteration_cap: DEFAULT_ITERATION_CAP,
            cancellation_token: None,
        }
    }

    /// Replace the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    /// Override the iteration cap (must remain &ge; [`DEFAULT_ITERATION_CAP`]
    /// to honor the spec's "last-resort infinite-loop guard"; callers that
    /// pass a smaller value get a tighter guard, which is still a valid
    /// safety net, just not the documented default).
    #[must_use]
    pub fn with_iteration_cap(mut self, cap: usize) -> Self {
        self.iteration_cap = cap;
        self
    }

    /// Bind a cancellation token. It is polled once per [`Executor::step`]
    /// call, immediately before the component's dispatch (including any
    /// host-service invocation) — a single checkpoint that covers both the
    /// per-step boundary and the pre-dispatch point, since nothing else
    /// happens between them.
    #[must_use]
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Run an observer callback inside [`catch_unwind`], the same isolation
    /// [`CompositeObserver`] gives its inner observers, so a single
    /// non-composite `Observer` installed via [`Executor::with_observer`]
    /// can't unwind a step either.
    fn notify(&self, f: impl FnOnce(&dyn Observer)) {
        let observer = self.observer.as_ref();
        let _ = catch_unwind(AssertUnwindSafe(|| f(observer)));
    }

    /// Build the context an abort or cancellation leaves behind: a
    /// `COMPONENT_FAILED` audit entry for the in-flight component, status
    /// `Aborted`.
    fn build_aborted_context(ctx: &ExecutionContext, reason: &str) -> ExecutionContext {
        let component_id = ctx.current_component_id.clone().unwrap_or_else(|| ComponentId::new("unknown"));
        let snapshot = ctx.variables.clone();
        ctx.with_audit_entry(AuditEntry::new(component_id, AuditAction::ComponentFailed, reason.to_string(), snapshot))
            .with_status(ExecutionStatus::Aborted)
    }

    /// Seed a fresh context for `flow`, or pass `initial_context` through
    /// unchanged.
    fn seed_context(flow: &Flow, initial_context: Option<ExecutionContext>) -> Result<ExecutionContext, EngineError> {
        if let Some(ctx) = initial_context {
            return Ok(ctx);
        }
        let start = flow
            .start()
            .ok_or_else(|| EngineError::InvalidGraph("flow has no unique Start component".into()))?;
        Ok(ExecutionContext::new(
            flow.id.to_string(),
            ExecutionId::v4().to_string(),
            start.id().clone(),
        ))
    }

    /// Run `flow` according to `mode`, starting from `initial_context` (or a
    /// freshly-seeded one).
    pub async fn execute(
        &self,
        flow: &Flow,
        initial_context: Option<ExecutionContext>,
        mode: ExecutionMode,
    ) -> Result<ExecutionResult, EngineError> {
        if !graph::validate_dag(flow) {
            return Err(EngineError::InvalidGraph("component graph contains a cycle".into()));
        }

        let started_at = Instant::now();
        let mut ctx = Self::seed_context(flow, initial_context)?;

        if ctx.status == ExecutionStatus::NotStarted {
            self.notify(|o| o.on_execution_started(&ctx, Utc::now()));
            ctx = ctx.with_status(ExecutionStatus::Running);
        }

        let breakpoints = match &mode {
            ExecutionMode::RunToBreakpoint(set) => Some(set.clone()),
            _ => None,
        };
        let single_step = matches!(mode, ExecutionMode::StepByStep);
        let mut last_entered: Option<ComponentId> = None;

        let mut iterations = 0usize;
        loop {
            let Some(current_id) = ctx.current_component_id.clone() else {
                break;
            };

            if let Some(breakpoints) = &breakpoints {
                if breakpoints.contains(&current_id) && ctx.status == ExecutionStatus::Running {
                    ctx = ctx.with_status(ExecutionStatus::Paused);
                    return Ok(ExecutionResult::success(ctx, elapsed_ms(started_at)));
                }
            }

            iterations += 1;
            if iterations > self.iteration_cap {
                let ctx = ctx.with_status(ExecutionStatus::Failed);
                let message = format!("iteration cap of {} exceeded", self.iteration_cap);
                self.notify(|o| o.on_execution_failed(&ctx, &message, Utc::now()));
                return Ok(ExecutionResult::failure(ctx, elapsed_ms(started_at), message));
            }

            last_entered = Some(current_id);

            let step = self.step(flow, ctx).await;
            ctx = step.context;

            if let Some(error) = step.error {
                return Ok(ExecutionResult::failure(ctx, elapsed_ms(started_at), error));
            }

            if step.is_complete {
                break;
            }

            if single_step {
                ctx = ctx.with_status(ExecutionStatus::Paused);
                return Ok(ExecutionResult::success(ctx, elapsed_ms(started_at)));
            }
        }

        let reached_end = last_entered
            .as_ref()
            .and_then(|id| flow.component(id))
            .is_some_and(|c| matches!(c, Component::End(_)));

        if reached_end {
            ctx = ctx.with_status(ExecutionStatus::Completed);
            self.notify(|o| o.on_execution_completed(&ctx, Utc::now()));
            Ok(ExecutionResult::success(ctx, elapsed_ms(started_at)))
        } else {
            ctx = ctx.with_status(ExecutionStatus::Failed);
            let message = format!(
                "unexpected termination at component {:?}",
                last_entered.map(|id| id.to_string())
            );
            self.notify(|o| o.on_execution_failed(&ctx, &message, Utc::now()));
            Ok(ExecutionResult::failure(ctx, elapsed_ms(started_at), message))
        }
    }

    /// Execute exactly one component, returning the updated context.
    pub async fn step(&self, flow: &Flow, ctx: ExecutionContext) -> StepResult {
        let Some(current_id) = ctx.current_component_id.clone() else {
            return StepResult {
                context: ctx,
                is_complete: true,
                error: None,
            };
        };

        let Some(component) = flow.component(&current_id) else {
            let ctx = ctx.with_status(ExecutionStatus::Failed);
            return StepResult {
                context: ctx,
                is_complete: true,
                error: Some("component not found".to_string()),
            };
        };
        let component = component.clone();

        if self.is_cancelled() {
            let reason = "aborted";
            let aborted = Self::build_aborted_context(&ctx, reason);
            self.notify(|o| o.on_execution_aborted(&aborted, reason, Utc::now()));
            return StepResult {
                context: aborted,
                is_complete: true,
                error: Some(reason.to_string()),
            };
        }

        let now = Utc::now();
        self.notify(|o| o.on_component_enter(&component, &ctx, now));

        let entry_snapshot = ctx.variables.clone();
        let mut next_ctx = ctx.with_audit_entry(AuditEntry::new(
            current_id.clone(),
            AuditAction::ComponentStarted,
            format!("entering {}", component.name()),
            entry_snapshot.clone(),
        ));
        next_ctx = next_ctx.with_frame_pushed(StackFrame::new(current_id.clone(), component.kind_name().to_lowercase()));

        let dispatch_started = Instant::now();
        let dispatch_result = self.dispatch(&component, &next_ctx).await;

        let (next_ctx, dispatch_error) = match dispatch_result {
            Ok(updated) => (updated, None),
            Err(message) => (next_ctx.clone(), Some(message)),
        };

        if let Some(message) = dispatch_error {
            let failed = next_ctx
                .with_frame_popped()
                .with_audit_entry(AuditEntry::new(
                    current_id.clone(),
                    AuditAction::ComponentFailed,
                    message.clone(),
                    entry_snapshot,
                ))
                .with_status(ExecutionStatus::Failed);
            self.notify(|o| o.on_execution_failed(&failed, &message, Utc::now()));
            return StepResult {
                context: failed,
                is_complete: true,
                error: Some(message),
            };
        }

        let completed_ctx = next_ctx.with_frame_popped().with_audit_entry(AuditEntry::new(
            current_id.clone(),
            AuditAction::ComponentCompleted,
            format!("completed {}", component.name()),
            next_ctx.variables.clone(),
        ));

        let duration_ms = u64::try_from(dispatch_started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.notify(|o| o.on_component_exit(&component, "ok", &completed_ctx, Utc::now(), duration_ms));
        self.notify(|o| o.on_context_changed(&ctx, &completed_ctx, "component_executed", Utc::now()));

        let successor = graph::resolve_next(flow, &component, &completed_ctx.variables);
        let is_complete = successor.is_none();
        let final_ctx = completed_ctx.with_current_component(successor);

        StepResult {
            context: final_ctx,
            is_complete,
            error: None,
        }
    }

    /// Abort `ctx` immediately: append a failure audit entry, mark the
    /// status aborted, and notify the observer.
    #[must_use]
    pub fn abort(&self, ctx: ExecutionContext, _flow: &Flow) -> AbortResult {
        let reason = "aborted".to_string();
        let aborted = Self::build_aborted_context(&ctx, &reason);
        self.notify(|o| o.on_execution_aborted(&aborted, &reason, Utc::now()));
        AbortResult {
            context: aborted,
            reason,
        }
    }

    /// Variant-specific behavior for one step. Returns the updated context
    /// on success, or a human-readable error message on failure.
    async fn dispatch(&self, component: &Component, ctx: &ExecutionContext) -> Result<ExecutionContext, String> {
        match component {
            Component::Start(_) => Ok(ctx.clone()),
            Component::End(_) => Ok(ctx.clone()),
            Component::Action(_) => self.dispatch_action(component, ctx).await,
            Component::Decision(_) => Ok(self.dispatch_decision(component, ctx)),
            Component::Fork(_) => Ok(self.dispatch_fork(component, ctx)),
            Component::Join(_) => Ok(self.dispatch_join(component, ctx)),
        }
    }

    async fn dispatch_action(&self, component: &Component, ctx: &ExecutionContext) -> Result<ExecutionContext, String> {
        let service = component.service().ok_or("action missing service property")?;
        let method = component.method().ok_or("action missing method property")?;

        let result = self
            .registry
            .execute(service, method, ctx.variables.clone())
            .await;

        match result {
            crate::host_service::ServiceResult::Success(value) => {
                let output_port = component
                    .ports()
                    .into_iter()
                    .find(|p| p.direction == PortDirection::Output)
                    .map(|p| p.id);
                Ok(match output_port {
                    Some(port_id) => ctx.with_variable(port_id, value),
                    None => ctx.clone(),
                })
            }
            crate::host_service::ServiceResult::Failure(message) => Err(message),
        }
    }

    fn dispatch_decision(&self, component: &Component, ctx: &ExecutionContext) -> ExecutionContext {
        let condition = component.condition().unwrap_or_default();
        let chosen = graph::evaluate_condition(condition, &ctx.variables);
        let snapshot = ctx.variables.clone();
        let next = ctx.with_audit_entry(AuditEntry::new(
            component.id().clone(),
            AuditAction::VariableUpdated,
            format!("evaluated condition {condition}"),
            snapshot,
        ));
        self.notify(|o| o.on_decision_evaluated(component, condition, chosen, &next, Utc::now()));
        next
    }

    fn dispatch_fork(&self, component: &Component, ctx: &ExecutionContext) -> ExecutionContext {
        let branches = component.branch_count().unwrap_or(2);
        ctx.with_audit_entry(AuditEntry::new(
            component.id().clone(),
            AuditAction::ContextChanged,
            format!("forking into {branches} branch(es), sequential core follows the first"),
            ctx.variables.clone(),
        ))
    }

    fn dispatch_join(&self, component: &Component, ctx: &ExecutionContext) -> ExecutionContext {
        let mode = component.join_mode();
        ctx.with_audit_entry(AuditEntry::new(
            component.id().clone(),
            AuditAction::ContextChanged,
            format!("joining with mode {mode:?}"),
            ctx.variables.clone(),
        ))
    }
}

fn elapsed_ms(started_at: Instant) -> u64 {
    u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Build a [`CompositeObserver`] from a list of observers, for callers that
/// want to fan out to several at once without hand-rolling the composite.
#[must_use]
pub fn compose(observers: Vec<Box<dyn Observer>>) -> CompositeObserver {
    observers
        .into_iter()
        .fold(CompositeObserver::new(), CompositeObserver::with)
}
