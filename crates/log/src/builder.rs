//! Installs the global `tracing` subscriber from a [`Config`].

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format};
use crate::error::LogError;

/// Builds and installs the process-wide `tracing` subscriber.
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Keeps the installed subscriber alive. Dropping it does not tear the
/// subscriber down — `tracing`'s global dispatcher cannot be uninstalled —
/// but callers that want an RAII handle (e.g. to hold for `main`'s lifetime)
/// have one.
#[derive(Debug)]
pub struct LoggerGuard {
    _private: (),
}

impl LoggerBuilder {
    /// Build from an explicit [`Config`].
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Install the subscriber, returning a guard on success.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Filter`] if `config.level` is not a valid
    /// `EnvFilter` directive string, or [`LogError::AlreadyInstalled`] if a
    /// global subscriber is already set.
    pub fn build(self) -> Result<LoggerGuard, LogError> {
        let filter = EnvFilter::try_new(&self.config.level).map_err(|source| LogError::Filter {
            directive: self.config.level.clone(),
            source,
        })?;

        let with_source = self.config.with_source;
        let registry = Registry::default().with(filter);

        let result = match self.config.format {
            Format::Pretty => {
                let fmt = tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_file(with_source)
                    .with_line_number(with_source);
                registry.with(fmt).try_init()
            }
            Format::Compact => {
                let fmt = tracing_subscriber::fmt::layer()
                    .compact()
                    .with_file(with_source)
                    .with_line_number(with_source);
                registry.with(fmt).try_init()
            }
            Format::Json => {
                let fmt = tracing_subscriber::fmt::layer()
                    .json()
                    .with_file(with_source)
                    .with_line_number(with_source);
                registry.with(fmt).try_init()
            }
        };

        result.map_err(|_| LogError::AlreadyInstalled)?;
        Ok(LoggerGuard { _private: () })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_is_rejected_before_install() {
        let config = Config {
            level: "not a valid directive !!".to_string(),
            ..Config::default()
        };
        let err = LoggerBuilder::from_config(config).build().unwrap_err();
        assert!(matches!(err, LogError::Filter { .. }));
    }
}
