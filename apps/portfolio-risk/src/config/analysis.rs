//! Analysis parameters: rates, window length, VaR level and benchmark.

use serde::{Deserialize, Serialize};

/// Parameters of the risk computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Risk-free rate (annualized).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate_annual: f64,
    /// Expected market return (annualized), used by the synthetic benchmark.
    #[serde(default = "default_market_return")]
    pub market_return_annual: f64,
    /// Length of the trailing monthly return window.
    #[serde(default = "default_trailing_months")]
    pub trailing_months: usize,
    /// Tail probability for historical VaR (0.05 = 5th percentile).
    #[serde(default = "default_var_confidence")]
    pub var_confidence: f64,
    /// Allowed deviation of allocation weights from 1.0.
    #[serde(default = "default_allocation_tolerance")]
    pub allocation_tolerance: f64,
    /// Compute metrics and risk factors concurrently.
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Fail instead of reporting `None` when a ratio denominator is zero.
    #[serde(default)]
    pub strict_ratios: bool,
    /// Synthetic benchmark settings.
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            risk_free_rate_annual: default_risk_free_rate(),
            market_return_annual: default_market_return(),
            trailing_months: default_trailing_months(),
            var_confidence: default_var_confidence(),
            allocation_tolerance: default_allocation_tolerance(),
            parallel: true,
            strict_ratios: false,
            benchmark: BenchmarkConfig::default(),
        }
    }
}

/// Synthetic benchmark settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Half-width of the uniform noise added to each monthly benchmark return,
    /// at most 1.0.
    #[serde(default = "default_noise_amplitude")]
    pub noise_amplitude: f64,
    /// Seed for reproducible noise (None = OS entropy).
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            noise_amplitude: default_noise_amplitude(),
            seed: None,
        }
    }
}

const fn default_risk_free_rate() -> f64 {
    0.02
}

const fn default_market_return() -> f64 {
    0.08
}

const fn default_trailing_months() -> usize {
    12
}

const fn default_var_confidence() -> f64 {
    0.05
}

const fn default_allocation_tolerance() -> f64 {
    1e-6
}

const fn default_noise_amplitude() -> f64 {
    0.01
}

pub(crate) const fn default_true() -> bool {
    true
}
