use serde::{Deserialize, Serialize};

/// The type a port accepts or produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PortType {
    /// Accepts or produces any type.
    Any,
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
    /// A JSON string.
    String,
    /// A JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
    /// JSON null.
    Null,
    /// A control-flow edge, carrying no data.
    Control,
}

impl PortType {
    /// Whether a connection from a port of type `self` to a port of type
    /// `other` is accepted. `Control` is only compatible with itself; any
    /// other pair is compatible if the types match or either side is `Any`.
    #[must_use]
    pub fn is_compatible_with(self, other: PortType) -> bool {
        match (self, other) {
            (PortType::Control, PortType::Control) => true,
            (PortType::Control, _) | (_, PortType::Control) => false,
            (PortType::Any, _) | (_, PortType::Any) => true,
            (a, b) => a == b,
        }
    }
}

/// The direction data flows through a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PortDirection {
    /// Data flows into the component through this port.
    Input,
    /// Data flows out of the component through this port.
    Output,
}

/// A named, typed, directional attachment point on a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Stable identifier, unique within the owning component.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Direction of data flow.
    pub direction: PortDirection,
    /// The port's declared type.
    pub port_type: PortType,
    /// Whether a connection to/from this port is mandatory for a valid flow.
    pub required: bool,
    /// Whether this port accepts more than one connection (fan-in/fan-out).
    pub multiple: bool,
}

impl Port {
    /// Construct a port with `required = false` and `multiple = false`.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, direction: PortDirection, port_type: PortType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            direction,
            port_type,
            required: false,
            multiple: false,
        }
    }

    /// Mark this port as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark this port as accepting multiple connections.
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PortType::String, PortType::String, true)]
    #[case(PortType::String, PortType::Number, false)]
    #[case(PortType::Any, PortType::String, true)]
    #[case(PortType::String, PortType::Any, true)]
    #[case(PortType::Control, PortType::Control, true)]
    #[case(PortType::Control, PortType::Any, false)]
    #[case(PortType::Any, PortType::Control, false)]
    fn compatibility_matrix(#[case] a: PortType, #[case] b: PortType, #[case] expected: bool) {
        assert_eq!(a.is_compatible_with(b), expected);
    }

    #[test]
    fn builder_sets_flags() {
        let port = Port::new("out", "Out", PortDirection::Output, PortType::Any)
            .required()
            .multiple();
        assert!(port.required);
        assert!(port.multiple);
    }

    #[test]
    fn serde_uses_uppercase_tags() {
        let json = serde_json::to_value(PortType::Boolean).unwrap();
        assert_eq!(json, serde_json::json!("BOOLEAN"));
    }
}
