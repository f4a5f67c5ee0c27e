#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Nebula Execution
//!
//! The immutable execution snapshot, audit trail, rollback engine, and
//! observer protocol for the Nebula workflow engine.
//!
//! This crate models execution-time concepts — it does NOT contain the
//! engine orchestrator (see `nebula-engine`). Every value here is an
//! immutable snapshot: mutating methods return a new value rather than
//! changing one in place, so an [`ExecutionContext`] can be rethreaded
//! through a step, rolled back, or replayed without aliasing concerns.
//!
//! - [`status::ExecutionStatus`] — the six-state execution lifecycle.
//! - [`transition`] — validates state-machine transitions between statuses.
//! - [`audit::AuditEntry`] / [`audit::AuditAction`] — the append-only trail
//!   that makes rollback possible.
//! - [`context::ExecutionContext`] / [`context::StackFrame`] — the
//!   rethreaded snapshot itself.
//! - [`rollback`] — rewinds a context to an earlier completed component.
//! - [`observer::Observer`] — the lifecycle notification contract, plus
//!   [`observer::NoopObserver`] and [`observer::CompositeObserver`].

pub mod audit;
pub mod context;
pub mod error;
pub mod observer;
pub mod rollback;
pub mod status;
pub mod transition;

pub use audit::{AuditAction, AuditEntry};
pub use context::{ExecutionContext, StackFrame};
pub use error::{ExecutionError, RollbackError};
pub use observer::{CompositeObserver, NoopObserver, Observer};
pub use rollback::{available_rollback_points, can_rollback, rollback, rollback_to, RollbackPoint};
pub use status::ExecutionStatus;
pub use transition::{can_transition, validate_transition};
