//! Lifecycle notification contract, with untrusted-callback isolation.

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use nebula_workflow::Component;

use crate::context::ExecutionContext;

/// A passive subscriber to execution lifecycle events.
///
/// All methods default to no-ops, so an observer only needs to override the
/// callbacks it cares about. Implementations must not share mutable state
/// with the execution path; the executor treats every callback as
/// untrusted and continues regardless of what it does.
pub trait Observer: Send + Sync {
    /// A new execution began.
    fn on_execution_started(&self, _ctx: &ExecutionContext, _timestamp: DateTime<Utc>) {}

    /// Execution is about to dispatch `component`.
    fn on_component_enter(
        &self,
        _component: &Component,
        _ctx: &ExecutionContext,
        _timestamp: DateTime<Utc>,
    ) {
    }

    /// `component` finished dispatching.
    fn on_component_exit(
        &self,
        _component: &Component,
        _result: &str,
        _ctx: &ExecutionContext,
        _timestamp: DateTime<Utc>,
        _duration_ms: u64,
    ) {
    }

    /// The context changed between two steps.
    fn on_context_changed(
        &self,
        _old: &ExecutionContext,
        _new: &ExecutionContext,
        _reason: &str,
        _timestamp: DateTime<Utc>,
    ) {
    }

    /// A Decision component evaluated its condition.
    fn on_decision_evaluated(
        &self,
        _component: &Component,
        _condition_text: &str,
        _chosen_branch_is_true: bool,
        _ctx: &ExecutionContext,
        _timestamp: DateTime<Utc>,
    ) {
    }

    /// Execution reached an End component successfully.
    fn on_execution_completed(&self, _ctx: &ExecutionContext, _timestamp: DateTime<Utc>) {}

    /// Execution failed with an unrecovered error.
    fn on_execution_failed(&self, _ctx: &ExecutionContext, _reason: &str, _timestamp: DateTime<Utc>) {}

    /// Execution was aborted before reaching a terminal component.
    fn on_execution_aborted(&self, _ctx: &ExecutionContext, _reason: &str, _timestamp: DateTime<Utc>) {
    }
}

/// The default observer: every callback is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Multiplexes lifecycle events to a list of observers.
///
/// Each inner observer's callback runs inside [`catch_unwind`]; a panicking
/// observer is isolated and does not stop the others, nor the execution.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Box<dyn Observer>>,
}

impl CompositeObserver {
    /// Build an empty composite observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer to the fan-out list.
    #[must_use]
    pub fn with(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    fn for_each(&self, f: impl Fn(&dyn Observer)) {
        for observer in &self.observers {
            let observer = observer.as_ref();
            let _ = catch_unwind(AssertUnwindSafe(|| f(observer)));
        }
    }
}

impl Observer for CompositeObserver {
    fn on_execution_started(&self, ctx: &ExecutionContext, timestamp: DateTime<Utc>) {
        self.for_each(|o| o.on_execution_started(ctx, timestamp));
    }

    fn on_component_enter(
        &self,
        component: &Component,
        ctx: &ExecutionContext,
        timestamp: DateTime<Utc>,
    ) {
        self.for_each(|o| o.on_component_enter(component, ctx, timestamp));
    }

    fn on_component_exit(
        &self,
        component: &Component,
        result: &str,
        ctx: &ExecutionContext,
        timestamp: DateTime<Utc>,
        duration_ms: u64,
    ) {
        self.for_each(|o| o.on_component_exit(component, result, ctx, timestamp, duration_ms));
    }

    fn on_context_changed(
        &self,
        old: &ExecutionContext,
        new: &ExecutionContext,
        reason: &str,
        timestamp: DateTime<Utc>,
    ) {
        self.for_each(|o| o.on_context_changed(old, new, reason, timestamp));
    }

    fn on_decision_evaluated(
        &self,
        component: &Component,
        condition_text: &str,
        chosen_branch_is_true: bool,
        ctx: &ExecutionContext,
        timestamp: DateTime<Utc>,
    ) {
        self.for_each(|o| {
            o.on_decision_evaluated(component, condition_text, chosen_branch_is_true, ctx, timestamp);
        });
    }

    fn on_execution_completed(&self, ctx: &ExecutionContext, timestamp: DateTime<Utc>) {
        self.for_each(|o| o.on_execution_completed(ctx, timestamp));
    }

    fn on_execution_failed(&self, ctx: &ExecutionContext, reason: &str, timestamp: DateTime<Utc>) {
        self.for_each(|o| o.on_execution_failed(ctx, reason, timestamp));
    }

    fn on_execution_aborted(&self, ctx: &ExecutionContext, reason: &str, timestamp: DateTime<Utc>) {
        self.for_each(|o| o.on_execution_aborted(ctx, reason, timestamp));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingObserver {
        started: Arc<AtomicUsize>,
    }

    impl Observer for CountingObserver {
        fn on_execution_started(&self, _ctx: &ExecutionContext, _timestamp: DateTime<Utc>) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct PanickingObserver;

    impl Observer for PanickingObserver {
        fn on_execution_started(&self, _ctx: &ExecutionContext, _timestamp: DateTime<Utc>) {
            panic!("boom");
        }
    }

    fn ctx() -> ExecutionContext {
        ExecutionContext::new("flow-1", "exec-1", nebula_workflow::ComponentId::new("start"))
    }

    #[test]
    fn noop_observer_does_nothing() {
        let observer = NoopObserver;
        observer.on_execution_started(&ctx(), Utc::now());
    }

    #[test]
    fn composite_fans_out_to_every_observer() {
        let started = Arc::new(AtomicUsize::new(0));
        let composite = CompositeObserver::new()
            .with(Box::new(CountingObserver {
                started: started.clone(),
            }))
            .with(Box::new(CountingObserver {
                started: started.clone(),
            }));

        composite.on_execution_started(&ctx(), Utc::now());
        assert_eq!(started.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn composite_isolates_a_panicking_observer() {
        let started = Arc::new(AtomicUsize::new(0));
        let composite = CompositeObserver::new()
            .with(Box::new(PanickingObserver))
            .with(Box::new(CountingObserver {
                started: started.clone(),
            }));

        composite.on_execution_started(&ctx(), Utc::now());
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }
}
