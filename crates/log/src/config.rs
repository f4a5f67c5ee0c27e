//! Logging configuration: level, output format, and environment/preset construction.

use serde::{Deserialize, Serialize};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Multi-line, human-readable, ANSI-colored (development default).
    Pretty,
    /// Single-line, human-readable, no color.
    Compact,
    /// One JSON object per line (production default).
    Json,
}

/// Logger configuration.
///
/// `level` is an [`tracing_subscriber::EnvFilter`] directive string (e.g.
/// `"info"`, `"nebula_engine=debug,warn"`), not a single level — the filter
/// syntax is richer and this crate does not reinvent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// `EnvFilter` directive string.
    pub level: String,
    /// Output format.
    pub format: Format,
    /// Whether to include the source file and line on each event.
    pub with_source: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Compact,
            with_source: false,
        }
    }
}

impl Config {
    /// Read `NEBULA_LOG` (falling back to `RUST_LOG`) for the filter string,
    /// and `NEBULA_LOG_FORMAT` (`pretty` | `compact` | `json`) for the format.
    /// Unset or unrecognized values keep [`Config::default`]'s values.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("NEBULA_LOG") {
            config.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            config.level = level;
        }

        if let Ok(format) = std::env::var("NEBULA_LOG_FORMAT") {
            config.format = match format.to_lowercase().as_str() {
                "pretty" => Format::Pretty,
                "json" => Format::Json,
                _ => Format::Compact,
            };
        }

        config
    }

    /// Verbose, colorized, human-facing — a developer running `nebula` locally.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            with_source: true,
        }
    }

    /// Quiet, machine-parseable — the shape a log aggregator expects.
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            with_source: false,
        }
    }
}
