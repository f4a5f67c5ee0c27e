use indexmap::IndexMap;
use nebula_value::ComponentProperty;
use serde::{Deserialize, Serialize};

use crate::id::ComponentId;
use crate::port::{Port, PortDirection, PortType};

/// Fields every component variant carries, regardless of kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentBase {
    /// Non-blank, unique-within-flow identifier.
    pub id: ComponentId,
    /// Human-readable name; non-blank.
    pub name: String,
    /// Arbitrary declared properties, including the variant's required ones.
    pub properties: IndexMap<String, ComponentProperty>,
    /// Opaque metadata (position, tags, description, ...), round-tripped verbatim.
    pub metadata: IndexMap<String, ComponentProperty>,
}

impl ComponentBase {
    /// Look up a property and, if it is a literal string, return it.
    /// Expressions and non-string properties return `None` — this accessor is
    /// for the variant-level required *static* config (e.g. `service`,
    /// `method`, `condition`), which the loader does not resolve at runtime.
    #[must_use]
    pub fn literal_string(&self, key: &str) -> Option<&str> {
        match self.properties.get(key) {
            Some(ComponentProperty::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Look up a property and, if it is a number, return it.
    #[must_use]
    pub fn literal_number(&self, key: &str) -> Option<f64> {
        match self.properties.get(key) {
            Some(ComponentProperty::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

/// How a [`Component::Join`] combines its incoming branches. Stored even
/// though the sequential executor only reads it for audit purposes — a
/// future parallel executor needs this data and the domain model is the
/// right place to carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JoinMode {
    /// Proceed once every incoming branch has completed.
    All,
    /// Proceed once any one incoming branch has completed.
    Any,
    /// Proceed once `n` of the incoming branches have completed.
    NOfM(u32),
}

impl JoinMode {
    fn from_property(value: Option<&ComponentProperty>) -> Option<Self> {
        match value {
            Some(ComponentProperty::String(s)) if s == "all" => Some(Self::All),
            Some(ComponentProperty::String(s)) if s == "any" => Some(Self::Any),
            Some(ComponentProperty::Number(n)) if *n >= 1.0 => Some(Self::NOfM(*n as u32)),
            _ => None,
        }
    }
}

/// A node in a [`crate::Flow`]'s directed acyclic graph.
///
/// Closed over exactly the six kinds the engine understands; there is no
/// trait-object escape hatch. The loader, validator, and graph interpreter
/// all dispatch with an exhaustive `match`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Component {
    /// The single entry point of a flow.
    Start(ComponentBase),
    /// A terminal node; a flow must have at least one.
    End(ComponentBase),
    /// Dispatches to a host service method.
    Action(ComponentBase),
    /// Branches on a condition, following `true` or `false`.
    Decision(ComponentBase),
    /// Fans out to multiple branches (sequential core: follows the first).
    Fork(ComponentBase),
    /// Joins multiple branches back into one (sequential core: pass-through).
    Join(ComponentBase),
}

impl Component {
    /// The shared fields, regardless of variant.
    #[must_use]
    pub fn base(&self) -> &ComponentBase {
        match self {
            Component::Start(b)
            | Component::End(b)
            | Component::Action(b)
            | Component::Decision(b)
            | Component::Fork(b)
            | Component::Join(b) => b,
        }
    }

    /// This component's identifier.
    #[must_use]
    pub fn id(&self) -> &ComponentId {
        &self.base().id
    }

    /// This component's declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.base().name
    }

    /// The kind name, for diagnostics (`"START"`, `"ACTION"`, ...).
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Component::Start(_) => "START",
            Component::End(_) => "END",
            Component::Action(_) => "ACTION",
            Component::Decision(_) => "DECISION",
            Component::Fork(_) => "FORK",
            Component::Join(_) => "JOIN",
        }
    }

    /// `service` property, if this is an [`Component::Action`] and it is declared.
    #[must_use]
    pub fn service(&self) -> Option<&str> {
        match self {
            Component::Action(b) => b.literal_string("service"),
            _ => None,
        }
    }

    /// `method` property, if this is an [`Component::Action`] and it is declared.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        match self {
            Component::Action(b) => b.literal_string("method"),
            _ => None,
        }
    }

    /// `condition` property, if this is a [`Component::Decision`] and it is declared.
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        match self {
            Component::Decision(b) => b.literal_string("condition"),
            _ => None,
        }
    }

    /// Declared branch count, if this is a [`Component::Fork`] and it is declared.
    #[must_use]
    pub fn branch_count(&self) -> Option<u32> {
        match self {
            Component::Fork(b) => b.literal_number("branches").map(|n| n as u32),
            _ => None,
        }
    }

    /// Declared join mode, if this is a [`Component::Join`] and it is declared.
    #[must_use]
    pub fn join_mode(&self) -> Option<JoinMode> {
        match self {
            Component::Join(b) => JoinMode::from_property(b.properties.get("joinMode")),
            _ => None,
        }
    }

    /// The input/output ports this variant declares. Fork's branch outputs and
    /// Join's branch inputs are named `branch-0`, `branch-1`, ... up to the
    /// declared count (defaulting to 2 when undeclared, matching the
    /// "at least 2" minimum in the component table).
    #[must_use]
    pub fn ports(&self) -> Vec<Port> {
        match self {
            Component::Start(_) => vec![Port::new("out", "Out", PortDirection::Output, PortType::Control)],
            Component::End(_) => vec![Port::new("in", "In", PortDirection::Input, PortType::Control).required()],
            Component::Action(_) => vec![
                Port::new("in", "In", PortDirection::Input, PortType::Any).required(),
                Port::new("success", "Success", PortDirection::Output, PortType::Any),
                Port::new("error", "Error", PortDirection::Output, PortType::Any),
            ],
            Component::Decision(_) => vec![
                Port::new("in", "In", PortDirection::Input, PortType::Any).required(),
                Port::new("true", "True", PortDirection::Output, PortType::Control),
                Port::new("false", "False", PortDirection::Output, PortType::Control),
            ],
            Component::Fork(_) => {
                let branches = self.branch_count().unwrap_or(2).max(2);
                let mut ports = vec![Port::new("in", "In", PortDirection::Input, PortType::Any).required()];
                for i in 0..branches {
                    ports.push(Port::new(
                        format!("branch-{i}"),
                        format!("Branch {i}"),
                        PortDirection::Output,
                        PortType::Control,
                    ));
                }
                ports
            }
            Component::Join(_) => {
                let branches = self.branch_count().unwrap_or(2).max(2);
                let mut ports = Vec::new();
                for i in 0..branches {
                    ports.push(
                        Port::new(format!("branch-{i}"), format!("Branch {i}"), PortDirection::Input, PortType::Any)
                            .required(),
                    );
                }
                ports.push(Port::new("out", "Out", PortDirection::Output, PortType::Any));
                ports
            }
        }
    }
}
