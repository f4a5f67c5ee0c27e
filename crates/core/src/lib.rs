//! # Nebula Core
//!
//! Shared identifiers for the Nebula workflow engine. Everything flow-specific
//! (component, connection, and flow identifiers) lives closer to the domain
//! model in `nebula-workflow`; this crate only carries the one identifier that
//! genuinely wants to be a random UUID: [`ExecutionId`].
//!
//! ## Usage
//!
//! ```rust
//! use nebula_core::ExecutionId;
//!
//! let execution_id = ExecutionId::v4();
//! assert!(!execution_id.is_nil());
//! ```

pub mod id;

mod error;

pub use error::CoreError;
pub use id::ExecutionId;

/// Result type used throughout Nebula.
pub type Result<T> = std::result::Result<T, error::CoreError>;
