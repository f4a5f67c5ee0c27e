//! Logging setup errors.

use thiserror::Error;

/// Errors that can occur while building and installing the global subscriber.
#[derive(Debug, Error)]
pub enum LogError {
    /// The configured filter directive string failed to parse.
    #[error("invalid log filter {directive:?}: {source}")]
    Filter {
        /// The offending directive string.
        directive: String,
        /// The underlying parse error.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber was already installed (e.g. `build` called twice).
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_installed_display() {
        assert_eq!(
            LogError::AlreadyInstalled.to_string(),
            "a global tracing subscriber is already installed"
        );
    }
}
