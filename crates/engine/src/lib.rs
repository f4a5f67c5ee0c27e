#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Nebula Engine
//!
//! The graph interpreter: steps a loaded [`nebula_workflow::Flow`] forward
//! component by component, dispatching `Action` components to a
//! [`HostServiceRegistry`] and notifying an [`nebula_execution::Observer`].
//!
//! - [`Executor`] — drives a flow through [`ExecutionMode::RunToCompletion`],
//!   [`ExecutionMode::StepByStep`], or [`ExecutionMode::RunToBreakpoint`].
//! - [`HostService`] / [`HostServiceRegistry`] — the capability boundary
//!   `Action` components dispatch through.
//! - [`EngineError`] — errors from the executor's pre-flight checks.

pub mod error;
pub mod executor;
pub mod host_service;
pub mod registry;

pub use error::EngineError;
pub use executor::{
    compose, AbortResult, ExecutionMetrics, ExecutionMode, ExecutionResult, Executor, StepResult,
    DEFAULT_ITERATION_CAP,
};
pub use host_service::{HostService, ServiceResult};
pub use registry::HostServiceRegistry;
