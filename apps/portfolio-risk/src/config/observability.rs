//! `observability` section: log level and output format.

use serde::{Deserialize, Serialize};

use super::analysis::default_true;

/// Wrapper for the `observability.logging` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Subscriber settings used by [`crate::telemetry::init_tracing`].
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive (e.g. `info` or `portfolio_risk=debug`);
    /// ignored when `RUST_LOG` is set.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    /// `json`, `pretty` or `compact`.
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
    /// Attach the current span and span list to JSON records.
    #[serde(default = "default_true")]
    pub include_spans: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }

    fn default_format() -> String {
        "json".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: Self::default_format(),
            include_spans: true,
        }
    }
}
