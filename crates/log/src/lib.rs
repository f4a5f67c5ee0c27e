#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Nebula Log
//!
//! Structured logging for the Nebula workflow engine.
//!
//! This crate owns exactly two things: installing a `tracing-subscriber`
//! pipeline from a [`config::Config`], and the one [`observer::TracingObserver`]
//! this workspace ships — a `nebula-execution::Observer` that turns lifecycle
//! callbacks into structured `tracing` events. Metrics collection and span
//! propagation are contract-only: callers who want those implement their own
//! `Observer` against `nebula-execution` directly.

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, Format};
pub use error::LogError;
pub use observer::TracingObserver;
