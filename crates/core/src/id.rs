//! Unique identifiers for Nebula entities.
//!
//! [`ExecutionId`] is a strongly-typed UUID wrapper built on
//! [`domain-key`](https://crates.io/crates/domain-key)'s `Uuid<D>` mechanism. It is
//! `Copy`, 16 bytes, and supports `v4()` generation, `nil()`, string parsing, and
//! full serde support (serializes as a UUID string).
//!
//! Flow-level identifiers (`FlowId`, `ComponentId`, `ConnectionId`) are *not*
//! modeled here: they are caller-supplied strings from the flow document, not
//! generated UUIDs, and live as newtypes in `nebula-workflow` instead.

use domain_key::define_uuid;

pub use domain_key::UuidParseError;

define_uuid!(ExecutionIdDomain => ExecutionId);
