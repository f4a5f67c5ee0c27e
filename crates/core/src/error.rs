//! Shared error type for crates that need a minimal, dependency-free failure mode.

/// Errors that can occur constructing or parsing core identifiers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A UUID-backed identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] domain_key::UuidParseError),
}
