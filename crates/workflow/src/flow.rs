use indexmap::IndexMap;
use nebula_value::ComponentProperty;
use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::connection::Connection;
use crate::id::{ComponentId, FlowId};

/// A loaded, not-yet-validated directed graph of components and connections.
///
/// Construction is intentionally infallible: `Flow::new` does not enforce the
/// "exactly one Start", "ids are unique", or "no self-loops" invariants —
/// those are structural checks the [`crate::validate`] module runs as the
/// last step of loading (see that module's docs). Keeping construction
/// unconditional means a `Flow` can represent an in-progress or deliberately
/// invalid graph while it is being checked, which is what the loader and the
/// validator's own test suites need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    /// Non-blank identifier, taken verbatim from the document.
    pub id: FlowId,
    /// Human-readable name.
    pub name: String,
    /// Document version string (distinct from `schemaVersion`).
    pub version: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// All components, in document order.
    pub components: Vec<Component>,
    /// All connections, in document order.
    pub connections: Vec<Connection>,
    /// Opaque metadata, round-tripped verbatim.
    pub metadata: IndexMap<String, ComponentProperty>,
}

impl Flow {
    /// Find a component by id.
    #[must_use]
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id() == id)
    }

    /// The flow's Start component, if exactly one exists (use
    /// [`crate::validate::validate`] to guarantee this before relying on it).
    #[must_use]
    pub fn start(&self) -> Option<&Component> {
        let mut starts = self.components.iter().filter(|c| matches!(c, Component::Start(_)));
        let first = starts.next()?;
        if starts.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// All End components.
    pub fn ends(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| matches!(c, Component::End(_)))
    }

    /// Connections whose source is the given component.
    pub fn outgoing(&self, id: &ComponentId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| &c.source.component_id == id)
    }

    /// Connections whose target is the given component.
    pub fn incoming(&self, id: &ComponentId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| &c.target.component_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentBase;

    fn base(id: &str) -> ComponentBase {
        ComponentBase { id: ComponentId::new(id), name: id.into(), properties: IndexMap::new(), metadata: IndexMap::new() }
    }

    fn sample_flow() -> Flow {
        Flow {
            id: FlowId::new("f1"),
            name: "Sample".into(),
            version: "1".into(),
            description: None,
            components: vec![Component::Start(base("s")), Component::End(base("e"))],
            connections: vec![],
            metadata: IndexMap::new(),
        }
    }

    #[test]
    fn component_lookup_by_id() {
        let flow = sample_flow();
        assert!(flow.component(&ComponentId::new("s")).is_some());
        assert!(flow.component(&ComponentId::new("missing")).is_none());
    }

    #[test]
    fn start_returns_none_when_not_exactly_one() {
        let mut flow = sample_flow();
        assert!(flow.start().is_some());
        flow.components.push(Component::Start(base("s2")));
        assert!(flow.start().is_none());
    }

    #[test]
    fn ends_finds_all_end_components() {
        let flow = sample_flow();
        assert_eq!(flow.ends().count(), 1);
    }
}
