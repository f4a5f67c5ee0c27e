use semver::Version;

/// Schema versions this loader accepts directly (no migration needed).
pub const SUPPORTED_VERSIONS: [&str; 3] = ["1.0.0", "1.0.1", "1.1.0"];

/// The deprecated legacy family; accepted only via [`migrate_legacy_document`].
const DEPRECATED_MAJOR: u64 = 0;

/// Outcome of checking a document's declared schema version.
pub enum VersionCheck {
    /// Version is in [`SUPPORTED_VERSIONS`]; no migration needed.
    Supported,
    /// Version is a `0.9.x` release; the document must be migrated before parsing.
    DeprecatedNeedsMigration,
    /// Version is not recognized at all.
    Unsupported,
}

/// Classify a `schemaVersion` string.
#[must_use]
pub fn check_version(version: &str) -> VersionCheck {
    if SUPPORTED_VERSIONS.contains(&version) {
        return VersionCheck::Supported;
    }
    match Version::parse(version) {
        Ok(v) if v.major == DEPRECATED_MAJOR && v.minor == 9 => VersionCheck::DeprecatedNeedsMigration,
        _ => VersionCheck::Unsupported,
    }
}

/// Migrate a legacy `0.9.x` document in place to the `1.0.0` shape:
/// `nodes` → `components`, `edges` → `connections`, and within each edge,
/// `from`/`to` → `source`/`target`. Applied at the top level and one level
/// into `flow`; a document whose nested shape does not match after these
/// renames is left for ordinary validation to reject (no general deep-rename
/// is attempted — see the design notes on this decision).
pub fn migrate_legacy_document(value: &mut serde_json::Value) {
    if let Some(obj) = value.as_object_mut() {
        obj.insert("schemaVersion".to_string(), serde_json::Value::String("1.0.0".to_string()));
        if let Some(flow) = obj.get_mut("flow").and_then(serde_json::Value::as_object_mut) {
            if let Some(nodes) = flow.remove("nodes") {
                flow.insert("components".to_string(), nodes);
            }
            if let Some(edges) = flow.remove("edges") {
                flow.insert("connections".to_string(), edges);
            }
            if let Some(connections) = flow.get_mut("connections").and_then(serde_json::Value::as_array_mut) {
                for connection in connections {
                    if let Some(conn_obj) = connection.as_object_mut() {
                        if let Some(from) = conn_obj.remove("from") {
                            conn_obj.insert("source".to_string(), from);
                        }
                        if let Some(to) = conn_obj.remove("to") {
                            conn_obj.insert("target".to_string(), to);
                        }
                    }
                }
            }
        }
    }
}
