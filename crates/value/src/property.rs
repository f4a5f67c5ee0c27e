use indexmap::IndexMap;
use serde::Serialize;

use crate::value::VariableValue;

/// A prefix marking a JSON string as a deferred expression rather than a
/// literal. Loader classification rule: a string starting with either prefix
/// becomes [`ComponentProperty::Expression`]; everything else is a typed
/// literal.
const EXPRESSION_PREFIXES: [&str; 2] = ["${", "{{"];

/// A statically declared component property, as it appears in a flow
/// document. Structurally the same closed shape as [`VariableValue`], plus an
/// [`ComponentProperty::Expression`] variant for deferred text.
///
/// Classification from JSON happens through [`ComponentProperty::from_json`],
/// not through [`serde::Deserialize`] — `Expression` and `String` are
/// structurally identical JSON strings, so only the loader's prefix rule can
/// tell them apart. [`Serialize`] is still derived directly: both variants
/// round-trip to the same plain JSON string they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComponentProperty {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Boolean(bool),
    /// JSON number, always carried as double precision.
    Number(f64),
    /// A literal string (did not match an expression prefix).
    String(String),
    /// A deferred expression, e.g. `${variables.count}`.
    Expression(String),
    /// JSON array of nested properties.
    Array(Vec<ComponentProperty>),
    /// JSON object of nested properties, insertion-order preserving.
    Object(IndexMap<String, ComponentProperty>),
}

impl ComponentProperty {
    /// The name of this value's variant, for error messages and diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Expression(_) => "expression",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// True if this is an [`ComponentProperty::Expression`].
    #[must_use]
    pub fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }

    /// Build a [`ComponentProperty`] from a [`serde_json::Value`], classifying
    /// strings as literal or expression per the prefix rule.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(*b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => {
                if EXPRESSION_PREFIXES.iter().any(|p| s.starts_with(p)) {
                    Self::Expression(s.clone())
                } else {
                    Self::String(s.clone())
                }
            }
            serde_json::Value::Array(items) => Self::Array(items.iter().map(Self::from_json).collect()),
            serde_json::Value::Object(fields) => Self::Object(
                fields.iter().map(|(k, v)| (k.clone(), Self::from_json(v))).collect(),
            ),
        }
    }

    /// Convert back to a [`serde_json::Value`]; an `Expression` serializes as
    /// the plain string it was parsed from, preserving the round-trip law.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) | Self::Expression(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(fields) => serde_json::Value::Object(
                fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Resolve this property against a variable environment, producing the
    /// runtime value an action would see. Expressions that are not a bare
    /// variable lookup in `${name}` form resolve to the literal text, per the
    /// minimal expression rule this core ships (a richer evaluator is an
    /// extension point, not part of this crate).
    #[must_use]
    pub fn resolve(&self, variables: &IndexMap<String, VariableValue>) -> VariableValue {
        match self {
            Self::Null => VariableValue::Null,
            Self::Boolean(b) => VariableValue::Boolean(*b),
            Self::Number(n) => VariableValue::Number(*n),
            Self::String(s) => VariableValue::String(s.clone()),
            Self::Expression(expr) => resolve_expression(expr, variables),
            Self::Array(items) => VariableValue::Array(items.iter().map(|p| p.resolve(variables)).collect()),
            Self::Object(fields) => VariableValue::Object(
                fields.iter().map(|(k, v)| (k.clone(), v.resolve(variables))).collect(),
            ),
        }
    }
}

/// Strip a `${name}` wrapper and look the name up in `variables`; any other
/// shape, or a missing variable, resolves to the literal expression text.
fn resolve_expression(expr: &str, variables: &IndexMap<String, VariableValue>) -> VariableValue {
    if let Some(name) = expr.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        if let Some(value) = variables.get(name) {
            return value.clone();
        }
    }
    VariableValue::String(expr.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_expression_prefixes() {
        assert!(ComponentProperty::from_json(&serde_json::json!("${x}")).is_expression());
        assert!(ComponentProperty::from_json(&serde_json::json!("{{x}}")).is_expression());
        assert!(!ComponentProperty::from_json(&serde_json::json!("plain")).is_expression());
    }

    #[test]
    fn nested_classification() {
        let json = serde_json::json!({ "a": "${x}", "b": ["literal", "${y}"] });
        let prop = ComponentProperty::from_json(&json);
        let obj = match &prop {
            ComponentProperty::Object(o) => o,
            _ => panic!("expected object"),
        };
        assert!(obj["a"].is_expression());
        match &obj["b"] {
            ComponentProperty::Array(items) => {
                assert!(!items[0].is_expression());
                assert!(items[1].is_expression());
            }
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn roundtrip_preserves_expression_text() {
        let json = serde_json::json!("${variables.count}");
        let prop = ComponentProperty::from_json(&json);
        assert_eq!(prop.to_json(), json);
    }

    #[test]
    fn resolve_looks_up_bare_variable() {
        let mut vars = IndexMap::new();
        vars.insert("count".to_string(), VariableValue::Number(3.0));
        let prop = ComponentProperty::Expression("${count}".into());
        assert_eq!(prop.resolve(&vars), VariableValue::Number(3.0));
    }

    #[test]
    fn resolve_missing_variable_falls_back_to_text() {
        let vars = IndexMap::new();
        let prop = ComponentProperty::Expression("${missing}".into());
        assert_eq!(prop.resolve(&vars), VariableValue::String("${missing}".into()));
    }

    #[test]
    fn resolve_non_bare_expression_falls_back_to_text() {
        let vars = IndexMap::new();
        let prop = ComponentProperty::Expression("{{handlebars}}".into());
        assert_eq!(prop.resolve(&vars), VariableValue::String("{{handlebars}}".into()));
    }

    #[test]
    fn resolve_literal_passthrough() {
        let vars = IndexMap::new();
        assert_eq!(
            ComponentProperty::String("hi".into()).resolve(&vars),
            VariableValue::String("hi".into())
        );
        assert_eq!(ComponentProperty::Boolean(true).resolve(&vars), VariableValue::Boolean(true));
    }
}
