#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Nebula Value
//!
//! The runtime value and static property model for the Nebula workflow
//! engine.
//!
//! - [`VariableValue`] — a runtime binding in an [`ExecutionContext`], closed
//!   over the shape of JSON (null, boolean, number, string, array, object).
//! - [`ComponentProperty`] — the same shape plus [`ComponentProperty::Expression`],
//!   for a flow document's statically declared component properties.
//!
//! [`ExecutionContext`]: https://docs.rs/nebula-execution

mod property;
mod value;

pub use property::ComponentProperty;
pub use value::VariableValue;
