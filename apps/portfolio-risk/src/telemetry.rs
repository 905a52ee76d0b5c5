//! Logging Setup
//!
//! Initializes a `tracing-subscriber` fmt subscriber from [`LoggingConfig`].
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives; wins over `observability.logging.level`
//! - `observability.logging.format`: `json` (default), `pretty` or `compact`
//! - `observability.logging.include_spans`: attach the current span and span
//!   list to JSON records
//!
//! # Usage
//!
//! ```rust,ignore
//! use portfolio_risk::config::LoggingConfig;
//! use portfolio_risk::telemetry::init_tracing;
//!
//! init_tracing(&LoggingConfig::default())?;
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Error type for logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log level '{level}': {message}")]
    InvalidLevel {
        /// Configured level.
        level: String,
        /// Parser message.
        message: String,
    },
    /// Unknown output format.
    #[error("unknown log format '{0}'")]
    UnknownFormat(String),
    /// A global subscriber was already installed.
    #[error("failed to install subscriber: {0}")]
    Installation(String),
}

/// Build the filter: `RUST_LOG` when set, the configured level otherwise.
///
/// # Errors
///
/// Returns `InvalidLevel` if the configured level does not parse.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| TelemetryError::InvalidLevel {
        level: config.level.clone(),
        message: e.to_string(),
    })
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so stdout stays free for command output.
///
/// # Errors
///
/// Returns an error for an invalid level or format, or when a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format.as_str() {
        "json" => builder
            .json()
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .try_init(),
        "pretty" => builder.pretty().try_init(),
        "compact" => builder.compact().with_ansi(false).try_init(),
        other => return Err(TelemetryError::UnknownFormat(other.to_string())),
    };

    result.map_err(|e| TelemetryError::Installation(e.to_string()))?;

    tracing::debug!(
        format = %config.format,
        level = %config.level,
        "Logging initialized"
    );

    Ok(())
}
