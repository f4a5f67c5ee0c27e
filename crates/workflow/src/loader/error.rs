use std::fmt;

use thiserror::Error;

/// A single loader failure, tagged with the JSON path it was found at where
/// that makes sense. The loader collects every independent failure it can
/// before giving up (see [`crate::loader::load`]), so callers typically see
/// this wrapped in a [`LoadErrors`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The document text was not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    /// The top-level `schemaVersion` field is missing or not a string.
    #[error("missing or invalid schemaVersion field")]
    MissingSchemaVersion,
    /// The top-level `flow` field is missing.
    #[error("missing flow field")]
    MissingFlow,
    /// A field had the wrong JSON shape.
    #[error("invalid value at {path}: {reason}")]
    InvalidFlow {
        /// Dotted/indexed path into the document, e.g. `flow.components[3].id`.
        path: String,
        /// Human-readable description of the mismatch.
        reason: String,
    },
    /// `schemaVersion` does not name a version this loader understands.
    #[error("unsupported schema version {found}; supported versions: {}", .supported.join(", "))]
    UnsupportedSchemaVersion {
        /// The version string found in the document.
        found: String,
        /// The versions this loader accepts.
        supported: Vec<String>,
    },
    /// A component's `type` tag did not match a known variant.
    #[error("unknown component type {type_name:?} at {path}")]
    UnknownComponentType {
        /// Path to the offending component.
        path: String,
        /// The unrecognized type tag.
        type_name: String,
    },
    /// The structural/connection/graph validator rejected the flow.
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validate::ValidationError),
}

/// An ordered collection of independent [`LoadError`]s. The loader aggregates
/// as many errors as it safely can from a single pass rather than stopping at
/// the first one (see `load`'s pipeline docs).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadErrors(pub Vec<LoadError>);

impl LoadErrors {
    /// True if no errors were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LoadErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} load error(s):", self.0.len())?;
        for err in &self.0 {
            writeln!(f, "  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadErrors {}

impl From<LoadError> for LoadErrors {
    fn from(value: LoadError) -> Self {
        Self(vec![value])
    }
}
