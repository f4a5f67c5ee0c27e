#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Nebula Workflow
//!
//! The domain model, JSON loader, validator, and graph interpreter for the
//! Nebula workflow engine.
//!
//! - [`Flow`] / [`Component`] / [`Connection`] / [`Port`] — the closed domain
//!   model a flow document loads into.
//! - [`loader::load`] — JSON text to a validated [`Flow`], or the errors
//!   preventing that.
//! - [`validate::validate`] — the structural, connection, and graph checks
//!   [`loader::load`] runs as its last step; also callable directly against a
//!   hand-built [`Flow`] (e.g. in tests).
//! - [`graph`] — successor resolution, cycle detection, and path search over
//!   an already-validated flow; the pure core the executor steps through.

pub mod component;
pub mod connection;
pub mod flow;
pub mod graph;
pub mod id;
pub mod loader;
pub mod port;
pub mod validate;

pub use component::{Component, ComponentBase, JoinMode};
pub use connection::{Connection, ConnectionEndpoint};
pub use flow::Flow;
pub use id::{ComponentId, ConnectionId, FlowId};
pub use loader::{load, schema_version, validate_document, LoadError, LoadErrors, LoadResult};
pub use port::{Port, PortDirection, PortType};
pub use validate::{validate, ValidationError, ValidationWarning};
