use indexmap::IndexMap;
use nebula_value::ComponentProperty;
use serde::{Deserialize, Serialize};

use crate::id::{ComponentId, ConnectionId};

/// One endpoint of a [`Connection`]: a component and one of its ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEndpoint {
    /// The component owning the port.
    pub component_id: ComponentId,
    /// The port's identifier on that component.
    pub port_id: String,
}

/// A directed edge from an output port of one component to an input port of
/// another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Non-blank, unique-within-flow identifier.
    pub id: ConnectionId,
    /// The source (output) endpoint.
    pub source: ConnectionEndpoint,
    /// The target (input) endpoint.
    pub target: ConnectionEndpoint,
    /// Opaque metadata, round-tripped verbatim.
    pub metadata: IndexMap<String, ComponentProperty>,
}

impl Connection {
    /// Whether this connection's source and target are the same component
    /// (a structural error the validator must reject).
    #[must_use]
    pub fn is_self_connection(&self) -> bool {
        self.source.component_id == self.target.component_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_connection_detected() {
        let conn = Connection {
            id: ConnectionId::new("c1"),
            source: ConnectionEndpoint { component_id: ComponentId::new("a"), port_id: "out".into() },
            target: ConnectionEndpoint { component_id: ComponentId::new("a"), port_id: "in".into() },
            metadata: IndexMap::new(),
        };
        assert!(conn.is_self_connection());
    }

    #[test]
    fn distinct_endpoints_not_self_connection() {
        let conn = Connection {
            id: ConnectionId::new("c1"),
            source: ConnectionEndpoint { component_id: ComponentId::new("a"), port_id: "out".into() },
            target: ConnectionEndpoint { component_id: ComponentId::new("b"), port_id: "in".into() },
            metadata: IndexMap::new(),
        };
        assert!(!conn.is_self_connection());
    }
}
