//! Configuration module for the portfolio risk engine.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for the analysis parameters and logging.
//!
//! # Usage
//!
//! ```rust,ignore
//! use portfolio_risk::config::load_config;
//!
//! let config = load_config("config.yaml")?;
//! println!("trailing months: {}", config.analysis.trailing_months);
//! ```

mod analysis;
mod observability;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::{MAX_NOISE_AMPLITUDE, MAX_TRAILING_MONTHS};

pub use analysis::{AnalysisConfig, BenchmarkConfig};
pub use observability::{LoggingConfig, ObservabilityConfig};

/// Accepted values for `observability.logging.format`.
pub const LOG_FORMATS: [&str; 3] = ["json", "pretty", "compact"];

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be opened or read.
    #[error("cannot read risk config '{path}': {source}")]
    ReadError {
        /// Location that was read.
        path: String,
        /// I/O failure.
        source: std::io::Error,
    },

    /// The file is not valid YAML for [`Config`].
    #[error("malformed risk config: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// A value is outside its accepted range.
    #[error("invalid risk config: {0}")]
    ValidationError(String),
}

/// Top-level document: `analysis` and `observability` sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analysis parameters.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Logging settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Read, interpolate, parse and validate a YAML config file.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    std::fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadError {
            path: path.to_string(),
            source,
        })
        .and_then(|yaml| load_config_from_string(&yaml))
}

/// Same as [`load_config`] for an in-memory document.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml_bw::from_str(&interpolate_env_vars(yaml))?;
    validate_config(&config)?;
    Ok(config)
}

/// Replace `${VAR}` and `${VAR:-default}` with environment values. Unset or
/// empty variables take the default, or the empty string without one.
#[allow(clippy::expect_used)] // constant pattern
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static PLACEHOLDER: OnceLock<regex::Regex> = OnceLock::new();

    let pattern = PLACEHOLDER.get_or_init(|| {
        regex::Regex::new(r"\$\{(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?::-(?P<default>[^}]*))?\}")
            .expect("placeholder pattern compiles")
    });

    pattern
        .replace_all(input, |cap: &regex::Captures<'_>| {
            std::env::var(&cap["name"])
                .ok()
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| {
                    cap.name("default")
                        .map_or_else(String::new, |m| m.as_str().to_string())
                })
        })
        .into_owned()
}

/// Range checks applied after parsing.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let analysis = &config.analysis;
    let noise = analysis.benchmark.noise_amplitude;
    let format = config.observability.logging.format.as_str();

    ensure(
        (0.0..=1.0).contains(&analysis.risk_free_rate_annual),
        "risk_free_rate_annual must be between 0.0 and 1.0",
    )?;
    ensure(
        (-1.0..=1.0).contains(&analysis.market_return_annual),
        "market_return_annual must be between -1.0 and 1.0",
    )?;
    ensure(
        (2..=MAX_TRAILING_MONTHS).contains(&analysis.trailing_months),
        &format!("trailing_months must be between 2 and {MAX_TRAILING_MONTHS}"),
    )?;
    ensure(
        analysis.var_confidence > 0.0 && analysis.var_confidence <= 0.5,
        "var_confidence must be in (0.0, 0.5]",
    )?;
    ensure(
        analysis.allocation_tolerance > 0.0,
        "allocation_tolerance must be positive",
    )?;
    ensure(
        (0.0..=MAX_NOISE_AMPLITUDE).contains(&noise),
        &format!("benchmark.noise_amplitude must be between 0.0 and {MAX_NOISE_AMPLITUDE}"),
    )?;
    ensure(
        LOG_FORMATS.contains(&format),
        &format!("observability.logging.format must be one of {LOG_FORMATS:?}, got '{format}'"),
    )
}

fn ensure(condition: bool, message: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(message.to_string()))
    }
}
