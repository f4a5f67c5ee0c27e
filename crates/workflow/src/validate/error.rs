use thiserror::Error;

/// A fatal structural, connection, or graph-level problem with a flow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// No component of kind `Start` exists.
    #[error("flow has no Start component")]
    MissingStartComponent,
    /// More than one `Start` component exists.
    #[error("flow has {count} Start components, expected exactly one")]
    MultipleStartComponents {
        /// How many were found.
        count: usize,
    },
    /// No component of kind `End` exists.
    #[error("flow has no End component")]
    MissingEndComponent,
    /// Two components share an id.
    #[error("duplicate component id {id}")]
    DuplicateComponentId {
        /// The id shared by more than one component.
        id: String,
    },
    /// Two connections share an id.
    #[error("duplicate connection id {id}")]
    DuplicateConnectionId {
        /// The id shared by more than one connection.
        id: String,
    },
    /// A component's id is blank.
    #[error("component at index {index} has a blank id")]
    BlankComponentId {
        /// Index of the offending component in document order.
        index: usize,
    },
    /// A component's name is blank.
    #[error("component {id} has a blank name")]
    BlankComponentName {
        /// The component's id.
        id: String,
    },
    /// An `Action` component is missing its required `service` property.
    #[error("action component {id} is missing the required service property")]
    MissingServiceProperty {
        /// The component's id.
        id: String,
    },
    /// An `Action` component is missing its required `method` property.
    #[error("action component {id} is missing the required method property")]
    MissingMethodProperty {
        /// The component's id.
        id: String,
    },
    /// A `Decision` component is missing its required `condition` property.
    #[error("decision component {id} is missing the required condition property")]
    MissingConditionProperty {
        /// The component's id.
        id: String,
    },
    /// A connection's source component does not exist.
    #[error("connection {connection_id} has an unknown source component {component_id}")]
    InvalidSourceComponent {
        /// The connection's id.
        connection_id: String,
        /// The unknown component id it referenced.
        component_id: String,
    },
    /// A connection's target component does not exist.
    #[error("connection {connection_id} has an unknown target component {component_id}")]
    InvalidTargetComponent {
        /// The connection's id.
        connection_id: String,
        /// The unknown component id it referenced.
        component_id: String,
    },
    /// A connection's source port is not declared on its source component.
    #[error("connection {connection_id} has an unknown source port {port_id}")]
    InvalidSourcePort {
        /// The connection's id.
        connection_id: String,
        /// The undeclared port id.
        port_id: String,
    },
    /// A connection's target port is not declared on its target component.
    #[error("connection {connection_id} has an unknown target port {port_id}")]
    InvalidTargetPort {
        /// The connection's id.
        connection_id: String,
        /// The undeclared port id.
        port_id: String,
    },
    /// A connection's source and target are the same component.
    #[error("connection {connection_id} connects component {component_id} to itself")]
    SelfConnection {
        /// The connection's id.
        connection_id: String,
        /// The component id on both ends.
        component_id: String,
    },
    /// A connection's endpoint port types are not compatible.
    #[error("connection {connection_id} has incompatible port types: {source_type} -> {target_type}")]
    IncompatiblePortTypes {
        /// The connection's id.
        connection_id: String,
        /// The source port's type, for diagnostics.
        source_type: String,
        /// The target port's type, for diagnostics.
        target_type: String,
    },
    /// The component graph contains a cycle.
    #[error("cycle detected: {}", .path.join(" -> "))]
    CycleDetected {
        /// The component ids forming the cycle, in order.
        path: Vec<String>,
    },
}
