//! Tracing subscriber setup for the driver binary and the benches.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the executable. Nothing is logged from inside a timed region.

use std::env;

use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::error::{invalid_config, Result};

/// Subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Explicit filter directives, e.g. `mathbench=debug`. `None` defers to `RUST_LOG`.
    pub directives: Option<String>,
    /// Filter used when neither `directives` nor `RUST_LOG` is set.
    pub default_directive: String,
    pub ansi: bool,
    pub include_targets: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directives: None,
            default_directive: "info".to_string(),
            ansi: true,
            include_targets: false,
        }
    }
}

impl LogConfig {
    /// Build a configuration using environment hints.
    ///
    /// # Environment Variables
    ///
    /// - `MATHBENCH_LOG` - Filter directives, taking precedence over `RUST_LOG`
    /// - `MATHBENCH_LOG_ANSI` - `false`, `0` or `no` disables coloured output
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`LogConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(directives) = lookup("MATHBENCH_LOG") {
            if !directives.trim().is_empty() {
                config.directives = Some(directives);
            }
        }

        if let Some(ansi) = lookup("MATHBENCH_LOG_ANSI") {
            config.ansi = !(ansi.eq_ignore_ascii_case("false")
                || ansi == "0"
                || ansi.eq_ignore_ascii_case("no"));
        }

        config
    }

    fn resolve_filter(&self) -> Result<EnvFilter> {
        match &self.directives {
            Some(directives) => EnvFilter::try_new(directives)
                .map_err(|err| invalid_config(format!("invalid log directive: {err}"))),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&self.default_directive))),
        }
    }
}

/// Installs the configured subscriber as the process-wide default.
///
/// # Errors
///
/// Returns [`crate::BenchError::InvalidConfig`] if the directives do not parse
/// or a global subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let filter = config.resolve_filter()?;
    let layer = tracing_fmt::layer()
        .with_target(config.include_targets)
        .with_ansi(config.ansi)
        .with_writer(std::io::stderr);

    Registry::default()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|err| invalid_config(format!("failed to install tracing subscriber: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        assert_eq!(LogConfig::from_lookup(lookup(&[])), LogConfig::default());
    }

    #[test]
    fn test_directives_and_ansi() {
        let config = LogConfig::from_lookup(lookup(&[
            ("MATHBENCH_LOG", "mathbench=debug"),
            ("MATHBENCH_LOG_ANSI", "no"),
        ]));
        assert_eq!(config.directives.as_deref(), Some("mathbench=debug"));
        assert!(!config.ansi);
    }

    #[test]
    fn test_blank_directives_are_ignored() {
        let config = LogConfig::from_lookup(lookup(&[("MATHBENCH_LOG", "  ")]));
        assert_eq!(config.directives, None);
    }

    #[test]
    fn test_invalid_directive_is_a_config_error() {
        let config = LogConfig {
            directives: Some("mathbench=loudest".to_string()),
            ..LogConfig::default()
        };
        assert!(config.resolve_filter().is_err());
    }
}
