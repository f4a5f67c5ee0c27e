//! JSON → domain model loading.
//!
//! [`load`] runs the full pipeline described in the crate's design notes:
//! parse JSON, gate on `schemaVersion` (migrating `0.9.x` documents first),
//! convert each component/connection independently (collecting every error
//! rather than stopping at the first), then hand the resulting [`Flow`] to
//! [`crate::validate::validate`]. A structural failure that prevents further
//! processing at one level (e.g. `components` not being an array) only
//! short-circuits that level; sibling fields are still checked.

mod error;
mod schema_version;

pub use error::{LoadError, LoadErrors};
pub use schema_version::SUPPORTED_VERSIONS;

use indexmap::IndexMap;
use nebula_value::ComponentProperty;
use serde_json::{Map, Value};

use crate::component::{Component, ComponentBase};
use crate::connection::{Connection, ConnectionEndpoint};
use crate::flow::Flow;
use crate::id::{ComponentId, ConnectionId, FlowId};
use crate::validate::{self, ValidationWarning};
use schema_version::{check_version, migrate_legacy_document, VersionCheck};

/// A successfully loaded flow plus any non-fatal warnings the validator raised.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded, validated flow.
    pub flow: Flow,
    /// Non-fatal warnings (orphan components, unreachable ends, ...).
    pub warnings: Vec<ValidationWarning>,
}

/// Parse `text`, build the domain model, and validate it. Returns every
/// independent error found; see the module docs for the aggregation policy.
pub fn load(text: &str) -> Result<LoadResult, LoadErrors> {
    let mut document: Value = serde_json::from_str(text)
        .map_err(|e| LoadErrors(vec![LoadError::InvalidJson(e.to_string())]))?;

    let root = document
        .as_object()
        .ok_or_else(|| LoadErrors(vec![LoadError::InvalidFlow { path: "$".into(), reason: "not an object".into() }]))?;

    let schema_version = root
        .get("schemaVersion")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| LoadErrors(vec![LoadError::MissingSchemaVersion]))?;

    match check_version(&schema_version) {
        VersionCheck::Supported => {}
        VersionCheck::DeprecatedNeedsMigration => migrate_legacy_document(&mut document),
        VersionCheck::Unsupported => {
            return Err(LoadErrors(vec![LoadError::UnsupportedSchemaVersion {
                found: schema_version,
                supported: SUPPORTED_VERSIONS.iter().map(|s| (*s).to_string()).collect(),
            }]));
        }
    }

    let is_deprecated = matches!(check_version(&schema_version), VersionCheck::DeprecatedNeedsMigration);

    let root = document.as_object().expect("migration preserves object shape");
    let flow_value = root.get("flow").ok_or_else(|| LoadErrors(vec![LoadError::MissingFlow]))?;
    let flow_obj = flow_value
        .as_object()
        .ok_or_else(|| LoadErrors(vec![LoadError::InvalidFlow { path: "flow".into(), reason: "not an object".into() }]))?;

    let mut errors = Vec::new();
    let flow = build_flow(flow_obj, &mut errors);

    if !errors.is_empty() {
        return Err(LoadErrors(errors));
    }
    let flow = flow.expect("no errors implies a flow was built");

    let (validation_errors, mut warnings) = validate::validate(&flow);
    if !validation_errors.is_empty() {
        return Err(LoadErrors(
            validation_errors.into_iter().map(LoadError::Validation).collect(),
        ));
    }

    if is_deprecated {
        warnings.push(ValidationWarning::DeprecatedSchemaVersion { found: schema_version });
    }

    Ok(LoadResult { flow, warnings })
}

/// Parse and validate, discarding the flow; used when only the diagnostic
/// outcome matters.
pub fn validate_document(text: &str) -> Result<Vec<ValidationWarning>, LoadErrors> {
    load(text).map(|result| result.warnings)
}

/// Extract the declared `schemaVersion` without validating the rest of the document.
#[must_use]
pub fn schema_version(text: &str) -> Option<String> {
    let document: Value = serde_json::from_str(text).ok()?;
    document.get("schemaVersion")?.as_str().map(str::to_owned)
}

fn build_flow(flow_obj: &Map<String, Value>, errors: &mut Vec<LoadError>) -> Option<Flow> {
    let id = require_str(flow_obj, "id", "flow.id", errors);
    let name = require_str(flow_obj, "name", "flow.name", errors);
    let version = require_str(flow_obj, "version", "flow.version", errors);
    let description = flow_obj.get("description").and_then(Value::as_str).map(str::to_owned);
    let metadata = object_to_properties(flow_obj.get("metadata"));

    let components = build_components(flow_obj.get("components"), errors);
    let connections = build_connections(flow_obj.get("connections"), errors);

    if !errors.is_empty() {
        return None;
    }

    Some(Flow {
        id: FlowId::new(id?),
        name: name?,
        version: version?,
        description,
        components: components?,
        connections: connections?,
        metadata,
    })
}

fn build_components(value: Option<&Value>, errors: &mut Vec<LoadError>) -> Option<Vec<Component>> {
    let Some(value) = value else {
        errors.push(LoadError::InvalidFlow { path: "flow.components".into(), reason: "missing".into() });
        return None;
    };
    let Some(array) = value.as_array() else {
        errors.push(LoadError::InvalidFlow { path: "flow.components".into(), reason: "not an array".into() });
        return None;
    };

    let mut components = Vec::with_capacity(array.len());
    let mut ok = true;
    for (i, item) in array.iter().enumerate() {
        let path = format!("flow.components[{i}]");
        match build_component(item, &path) {
            Ok(component) => components.push(component),
            Err(err) => {
                errors.push(err);
                ok = false;
            }
        }
    }
    ok.then_some(components)
}

fn build_component(value: &Value, path: &str) -> Result<Component, LoadError> {
    let obj = value.as_object().ok_or_else(|| LoadError::InvalidFlow {
        path: path.to_string(),
        reason: "not an object".into(),
    })?;
    let id = obj.get("id").and_then(Value::as_str).ok_or_else(|| LoadError::InvalidFlow {
        path: format!("{path}.id"),
        reason: "missing or not a string".into(),
    })?;
    let name = obj.get("name").and_then(Value::as_str).ok_or_else(|| LoadError::InvalidFlow {
        path: format!("{path}.name"),
        reason: "missing or not a string".into(),
    })?;
    let kind = obj.get("type").and_then(Value::as_str).ok_or_else(|| LoadError::InvalidFlow {
        path: format!("{path}.type"),
        reason: "missing or not a string".into(),
    })?;

    let properties = object_to_properties(obj.get("properties"));
    let mut metadata = object_to_properties(obj.get("metadata"));
    if let Some(position) = obj.get("position") {
        metadata.insert("position".to_string(), ComponentProperty::from_json(position));
    }

    let base = ComponentBase { id: ComponentId::new(id), name: name.to_string(), properties, metadata };

    match kind.to_ascii_uppercase().as_str() {
        "START" => Ok(Component::Start(base)),
        "END" => Ok(Component::End(base)),
        "ACTION" => Ok(Component::Action(base)),
        "DECISION" => Ok(Component::Decision(base)),
        "FORK" => Ok(Component::Fork(base)),
        "JOIN" => Ok(Component::Join(base)),
        _ => Err(LoadError::UnknownComponentType { path: path.to_string(), type_name: kind.to_string() }),
    }
}

fn build_connections(value: Option<&Value>, errors: &mut Vec<LoadError>) -> Option<Vec<Connection>> {
    let Some(value) = value else {
        errors.push(LoadError::InvalidFlow { path: "flow.connections".into(), reason: "missing".into() });
        return None;
    };
    let Some(array) = value.as_array() else {
        errors.push(LoadError::InvalidFlow { path: "flow.connections".into(), reason: "not an array".into() });
        return None;
    };

    let mut connections = Vec::with_capacity(array.len());
    let mut ok = true;
    for (i, item) in array.iter().enumerate() {
        let path = format!("flow.connections[{i}]");
        match build_connection(item, &path) {
            Ok(connection) => connections.push(connection),
            Err(err) => {
                errors.push(err);
                ok = false;
            }
        }
    }
    ok.then_some(connections)
}

fn build_connection(value: &Value, path: &str) -> Result<Connection, LoadError> {
    let obj = value.as_object().ok_or_else(|| LoadError::InvalidFlow {
        path: path.to_string(),
        reason: "not an object".into(),
    })?;
    let id = obj.get("id").and_then(Value::as_str).ok_or_else(|| LoadError::InvalidFlow {
        path: format!("{path}.id"),
        reason: "missing or not a string".into(),
    })?;
    let source = build_endpoint(obj.get("source"), &format!("{path}.source"))?;
    let target = build_endpoint(obj.get("target"), &format!("{path}.target"))?;
    let metadata = object_to_properties(obj.get("metadata"));

    Ok(Connection { id: ConnectionId::new(id), source, target, metadata })
}

fn build_endpoint(value: Option<&Value>, path: &str) -> Result<ConnectionEndpoint, LoadError> {
    let obj = value
        .and_then(Value::as_object)
        .ok_or_else(|| LoadError::InvalidFlow { path: path.to_string(), reason: "missing or not an object".into() })?;
    let component_id = obj.get("componentId").and_then(Value::as_str).ok_or_else(|| LoadError::InvalidFlow {
        path: format!("{path}.componentId"),
        reason: "missing or not a string".into(),
    })?;
    let port_id = obj.get("portId").and_then(Value::as_str).ok_or_else(|| LoadError::InvalidFlow {
        path: format!("{path}.portId"),
        reason: "missing or not a string".into(),
    })?;
    Ok(ConnectionEndpoint { component_id: ComponentId::new(component_id), port_id: port_id.to_string() })
}

fn require_str(obj: &Map<String, Value>, key: &str, path: &str, errors: &mut Vec<LoadError>) -> Option<String> {
    match obj.get(key).and_then(Value::as_str) {
        Some(s) => Some(s.to_string()),
        None => {
            errors.push(LoadError::InvalidFlow { path: path.to_string(), reason: "missing or not a string".into() });
            None
        }
    }
}

fn object_to_properties(value: Option<&Value>) -> IndexMap<String, ComponentProperty> {
    value
        .and_then(Value::as_object)
        .map(|obj| obj.iter().map(|(k, v)| (k.clone(), ComponentProperty::from_json(v))).collect())
        .unwrap_or_default()
}
