//! End-to-end flow execution, exercising the loader, graph interpreter, and
//! executor together against hand-built flow documents.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use nebula_engine::{ExecutionMode, Executor, HostService, HostServiceRegistry, ServiceResult};
use nebula_execution::{ExecutionContext, ExecutionStatus};
use nebula_value::{ComponentProperty, VariableValue};
use nebula_workflow::{
    Component, ComponentBase, ComponentId, Connection, ConnectionEndpoint, ConnectionId, Flow, FlowId,
};

fn base(id: &str) -> ComponentBase {
    ComponentBase {
        id: ComponentId::new(id),
        name: id.to_string(),
        properties: IndexMap::new(),
        metadata: IndexMap::new(),
    }
}

fn connection(id: &str, from: &str, from_port: &str, to: &str, to_port: &str) -> Connection {
    Connection {
        id: ConnectionId::new(id),
        source: ConnectionEndpoint { component_id: ComponentId::new(from), port_id: from_port.into() },
        target: ConnectionEndpoint { component_id: ComponentId::new(to), port_id: to_port.into() },
        metadata: IndexMap::new(),
    }
}

/// start -> decision(flag) -> {true: end-approved, false: end-rejected}
fn decision_flow() -> Flow {
    let mut decision = base("d");
    decision
        .properties
        .insert("condition".into(), ComponentProperty::String("flag".into()));

    Flow {
        id: FlowId::new("decision-flow"),
        name: "decision".into(),
        version: "1".into(),
        description: None,
        components: vec![
            Component::Start(base("s")),
            Component::Decision(decision),
            Component::End(base("approved")),
            Component::End(base("rejected")),
        ],
        connections: vec![
            connection("c1", "s", "out", "d", "in"),
            connection("c2", "d", "true", "approved", "in"),
            connection("c3", "d", "false", "rejected", "in"),
        ],
        metadata: IndexMap::new(),
    }
}

/// start -> fork(2 branches) -> join -> end. The sequential core follows
/// only the first branch; the join is a pass-through audited with its mode.
fn fork_join_flow() -> Flow {
    let mut fork = base("f");
    fork.properties.insert("branches".into(), ComponentProperty::Number(2.0));
    let mut join = base("j");
    join.properties.insert("joinMode".into(), ComponentProperty::String("all".into()));

    Flow {
        id: FlowId::new("fork-join-flow"),
        name: "fork-join".into(),
        version: "1".into(),
        description: None,
        components: vec![
            Component::Start(base("s")),
            Component::Fork(fork),
            Component::Join(join),
            Component::End(base("e")),
        ],
        connections: vec![
            connection("c1", "s", "out", "f", "in"),
            connection("c2", "f", "branch-0", "j", "branch-0"),
            connection("c3", "j", "out", "e", "in"),
        ],
        metadata: IndexMap::new(),
    }
}

struct EchoService;

#[async_trait]
impl HostService for EchoService {
    async fn execute(&self, method: &str, params: IndexMap<String, VariableValue>) -> ServiceResult {
        match params.get("value") {
            Some(value) => ServiceResult::success(value.clone()),
            None => ServiceResult::failure(format!("missing 'value' param for {method}")),
        }
    }
}

#[tokio::test]
async fn decision_flow_follows_true_branch_when_flag_is_set() {
    let executor = Executor::new(HostServiceRegistry::new());
    let mut ctx = ExecutionContext::new("decision-flow", "exec-1", ComponentId::new("s"));
    ctx.variables.insert("flag".to_string(), VariableValue::Boolean(true));

    let result = executor
        .execute(&decision_flow(), Some(ctx), ExecutionMode::RunToCompletion)
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(result.context.current_component_id, None);
    assert!(result
        .context
        .audit_trail
        .iter()
        .any(|e| e.component_id == ComponentId::new("approved")));
}

#[tokio::test]
async fn decision_flow_follows_false_branch_by_default() {
    let executor = Executor::new(HostServiceRegistry::new());
    let result = executor
        .execute(&decision_flow(), None, ExecutionMode::RunToCompletion)
        .await
        .unwrap();

    assert!(result.is_success());
    assert!(result
        .context
        .audit_trail
        .iter()
        .any(|e| e.component_id == ComponentId::new("rejected")));
}

#[tokio::test]
async fn fork_join_flow_completes_through_the_first_branch() {
    let executor = Executor::new(HostServiceRegistry::new());
    let result = executor
        .execute(&fork_join_flow(), None, ExecutionMode::RunToCompletion)
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(result.metrics.components_executed, 4);
}

#[tokio::test]
async fn step_by_step_mode_pauses_after_one_component() {
    let executor = Executor::new(HostServiceRegistry::new());
    let result = executor
        .execute(&fork_join_flow(), None, ExecutionMode::StepByStep)
        .await
        .unwrap();

    assert_eq!(result.context.status, ExecutionStatus::Paused);
    assert_eq!(result.context.current_component_id, Some(ComponentId::new("f")));
}

#[tokio::test]
async fn run_to_breakpoint_stops_before_the_flagged_component() {
    let registry = HostServiceRegistry::new().with_service("echo", Arc::new(EchoService));
    let executor = Executor::new(registry);

    let mut breakpoints = HashSet::new();
    breakpoints.insert(ComponentId::new("j"));

    let result = executor
        .execute(&fork_join_flow(), None, ExecutionMode::RunToBreakpoint(breakpoints))
        .await
        .unwrap();

    assert_eq!(result.context.status, ExecutionStatus::Paused);
    assert_eq!(result.context.current_component_id, Some(ComponentId::new("j")));
}

#[tokio::test]
async fn aborting_a_paused_execution_marks_it_aborted() {
    let executor = Executor::new(HostServiceRegistry::new());
    let paused = executor
        .execute(&fork_join_flow(), None, ExecutionMode::StepByStep)
        .await
        .unwrap();

    let aborted = executor.abort(paused.context, &fork_join_flow());
    assert_eq!(aborted.context.status, ExecutionStatus::Aborted);
    assert_eq!(aborted.reason, "aborted");
}

#[tokio::test]
async fn rolling_back_after_completion_resumes_from_the_last_completed_component() {
    let executor = Executor::new(HostServiceRegistry::new());

    let mut ctx = ExecutionContext::new("decision-flow", "exec-1", ComponentId::new("s"));
    ctx.variables.insert("flag".to_string(), VariableValue::Boolean(true));

    let completed = executor
        .execute(&decision_flow(), Some(ctx), ExecutionMode::RunToCompletion)
        .await
        .unwrap();

    assert!(nebula_execution::can_rollback(&completed.context, 1));
    let rolled_back = nebula_execution::rollback(&completed.context, 1).unwrap();
    assert_eq!(rolled_back.status, ExecutionStatus::Running);
    assert_eq!(rolled_back.current_component_id, Some(ComponentId::new("d")));
}

#[tokio::test]
async fn unresolvable_action_service_surfaces_as_a_failed_result() {
    let mut action = base("a");
    action.properties.insert("service".into(), ComponentProperty::String("missing".into()));
    action.properties.insert("method".into(), ComponentProperty::String("run".into()));

    let flow = Flow {
        id: FlowId::new("single-action"),
        name: "single-action".into(),
        version: "1".into(),
        description: None,
        components: vec![Component::Start(base("s")), Component::Action(action), Component::End(base("e"))],
        connections: vec![
            connection("c1", "s", "out", "a", "in"),
            connection("c2", "a", "success", "e", "in"),
        ],
        metadata: IndexMap::new(),
    };

    let executor = Executor::new(HostServiceRegistry::new());
    let result = executor.execute(&flow, None, ExecutionMode::RunToCompletion).await.unwrap();

    assert!(!result.is_success());
    assert_eq!(result.context.status, ExecutionStatus::Failed);
}
