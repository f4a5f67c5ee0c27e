use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw string as this identifier, without validating non-blankness.
            /// Prefer [`FlowId::try_new`]-style constructors at the loader boundary;
            /// this is for tests and internal construction where the value is known good.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

string_id!(FlowId, "Identifier of a flow, taken verbatim from its JSON document.");
string_id!(ComponentId, "Identifier of a component, taken verbatim from its JSON document.");
string_id!(ConnectionId, "Identifier of a connection, taken verbatim from its JSON document.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_as_str_match_input() {
        let id = ComponentId::new("start-1");
        assert_eq!(id.as_str(), "start-1");
        assert_eq!(id.to_string(), "start-1");
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(ComponentId::new("a"), ComponentId::from("a".to_string()));
        assert_ne!(ComponentId::new("a"), ComponentId::new("b"));
    }

    #[test]
    fn serde_roundtrip_is_bare_string() {
        let id = FlowId::new("my-flow");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"my-flow\"");
        let back: FlowId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn distinct_id_types_do_not_interop() {
        fn accepts_component(_id: ComponentId) {}
        fn accepts_connection(_id: ConnectionId) {}
        accepts_component(ComponentId::new("c"));
        accepts_connection(ConnectionId::new("k"));
    }
}
