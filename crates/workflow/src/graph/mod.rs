//! The graph interpreter: successor resolution, cycle detection, and path
//! search over a [`Flow`]'s component graph.
//!
//! All functions here are pure over `(Flow, ExecutionContext)` or `Flow`
//! alone — no mutation, no I/O. [`detect_cycles`] is shared between the
//! validator (a fatal structural check) and the executor's defensive
//! pre-flight check before stepping a flow that may have bypassed full
//! validation.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::component::{Component, JoinMode};
use crate::flow::Flow;
use crate::id::ComponentId;

/// Build a petgraph digraph mirroring `flow`'s components and connections,
/// along with an index of component id -> node index for lookups.
fn build_graph(flow: &Flow) -> (DiGraph<ComponentId, String>, HashMap<ComponentId, NodeIndex>) {
    let mut graph = DiGraph::new();
    let mut index = HashMap::new();
    for component in &flow.components {
        let node = graph.add_node(component.id().clone());
        index.insert(component.id().clone(), node);
    }
    for connection in &flow.connections {
        if let (Some(&src), Some(&tgt)) = (index.get(&connection.source.component_id), index.get(&connection.target.component_id)) {
            graph.add_edge(src, tgt, connection.source.port_id.clone());
        }
    }
    (graph, index)
}

/// Find every cycle reachable via DFS from any node, reported as the
/// sequence of component ids forming it (first id repeated at the end).
#[must_use]
pub fn detect_cycles(flow: &Flow) -> Vec<Vec<ComponentId>> {
    let (graph, index) = build_graph(flow);
    let mut cycles = Vec::new();
    let mut globally_visited = HashSet::new();

    for &start in index.values() {
        if globally_visited.contains(&start) {
            continue;
        }
        let mut stack_set = HashSet::new();
        let mut path = Vec::new();
        dfs_find_cycle(&graph, start, &mut stack_set, &mut path, &mut globally_visited, &mut cycles);
    }
    cycles
}

fn dfs_find_cycle(
    graph: &DiGraph<ComponentId, String>,
    node: NodeIndex,
    stack_set: &mut HashSet<NodeIndex>,
    path: &mut Vec<NodeIndex>,
    globally_visited: &mut HashSet<NodeIndex>,
    cycles: &mut Vec<Vec<ComponentId>>,
) {
    stack_set.insert(node);
    path.push(node);
    globally_visited.insert(node);

    for edge in graph.edges(node) {
        let next = edge.target();
        if stack_set.contains(&next) {
            let start = path.iter().position(|&n| n == next).unwrap_or(0);
            let mut cycle: Vec<ComponentId> = path[start..].iter().map(|&n| graph[n].clone()).collect();
            cycle.push(graph[next].clone());
            cycles.push(cycle);
        } else if !globally_visited.contains(&next) {
            dfs_find_cycle(graph, next, stack_set, path, globally_visited, cycles);
        }
    }

    path.pop();
    stack_set.remove(&node);
}

/// Whether `flow`'s component graph is acyclic.
#[must_use]
pub fn validate_dag(flow: &Flow) -> bool {
    detect_cycles(flow).is_empty()
}

/// Breadth-first shortest path from `from` to `to`, inclusive of both
/// endpoints. Returns the singleton path if `from == to`. `None` if
/// unreachable.
#[must_use]
pub fn find_path(flow: &Flow, from: &ComponentId, to: &ComponentId) -> Option<Vec<ComponentId>> {
    let (graph, index) = build_graph(flow);
    let &start = index.get(from)?;
    let &goal = index.get(to)?;

    if start == goal {
        return Some(vec![from.clone()]);
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    let mut predecessor = HashMap::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            let mut path = vec![current];
            let mut node = current;
            while let Some(&prev) = predecessor.get(&node) {
                path.push(prev);
                node = prev;
            }
            path.reverse();
            return Some(path.into_iter().map(|n| graph[n].clone()).collect());
        }
        for edge in graph.edges(current) {
            let next = edge.target();
            if visited.insert(next) {
                predecessor.insert(next, current);
                queue.push_back(next);
            }
        }
    }
    None
}

/// All component ids reachable from `from`, inclusive.
#[must_use]
pub fn reachable_from(flow: &Flow, from: &ComponentId) -> HashSet<ComponentId> {
    let (graph, index) = build_graph(flow);
    let mut reachable = HashSet::new();
    let Some(&start) = index.get(from) else { return reachable };

    let mut queue = VecDeque::new();
    reachable.insert(from.clone());
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for edge in graph.edges(current) {
            let next = edge.target();
            let next_id = graph[next].clone();
            if reachable.insert(next_id) {
                queue.push_back(next);
            }
        }
    }
    reachable
}

/// Resolve the deterministic successor of the component at
/// `current`, given the current variable bindings (used to evaluate a
/// `Decision`'s condition). `None` means execution has terminated (an `End`
/// was reached, or the component has no outgoing connection).
///
/// Condition evaluation is the minimal rule this core ships: a boolean
/// variable lookup defaulting to `false` (see [`evaluate_condition`]).
#[must_use]
pub fn resolve_next(flow: &Flow, current: &Component, variables: &indexmap::IndexMap<String, nebula_value::VariableValue>) -> Option<ComponentId> {
    match current {
        Component::End(_) => None,
        Component::Decision(_) => {
            let condition = current.condition().unwrap_or_default();
            let branch = if evaluate_condition(condition, variables) { "true" } else { "false" };
            flow.outgoing(current.id())
                .find(|c| c.source.port_id == branch)
                .map(|c| c.target.component_id.clone())
        }
        Component::Start(_) | Component::Action(_) | Component::Fork(_) | Component::Join(_) => {
            flow.outgoing(current.id()).next().map(|c| c.target.component_id.clone())
        }
    }
}

/// The core condition evaluation rule: look `condition` up as a variable
/// name; if it is a boolean, return it; otherwise default to `false`. A
/// richer expression evaluator is an extension point outside this core.
#[must_use]
pub fn evaluate_condition(condition: &str, variables: &indexmap::IndexMap<String, nebula_value::VariableValue>) -> bool {
    variables.get(condition).and_then(nebula_value::VariableValue::as_bool).unwrap_or(false)
}

/// How many incoming branches a [`Component::Join`] needs before its join
/// mode is satisfied, given how many branches it declares.
#[must_use]
pub fn join_threshold(mode: JoinMode, branch_count: u32) -> u32 {
    match mode {
        JoinMode::All => branch_count,
        JoinMode::Any => 1,
        JoinMode::NOfM(n) => n.min(branch_count),
    }
}
