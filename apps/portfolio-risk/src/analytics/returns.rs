//! Monthly return series for the portfolio and its benchmark.
//!
//! Without observed history the portfolio series is synthetic: each
//! holding's annualized total return is converted to a monthly rate,
//! value-weighted, and repeated for every month of the window. Callers that
//! have real per-period returns attach them with
//! [`Portfolio::with_historical_returns`] and the builder uses those instead.
//!
//! The benchmark series comes from a [`BenchmarkReturnProvider`] so a real
//! index feed can replace the seeded synthetic default.

use std::fmt::Debug;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::domain::Portfolio;
use crate::error::{Result, RiskAnalysisError};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Largest noise amplitude a [`SyntheticBenchmark`] will draw with.
pub const MAX_NOISE_AMPLITUDE: f64 = 1.0;

/// Longest window a [`ReturnSeriesBuilder`] will build (one hundred years).
pub const MAX_TRAILING_MONTHS: usize = 1200;

/// Source of monthly benchmark returns.
pub trait BenchmarkReturnProvider: Send + Sync + Debug {
    /// Produce `months` monthly benchmark returns, oldest first.
    fn monthly_returns(&self, months: usize) -> Vec<f64>;
}

/// Constant market drift plus uniform noise.
///
/// Each month is `market_return_annual / 12 + u` with
/// `u ~ U[-noise_amplitude, noise_amplitude]`. With a seed, every call yields
/// the same series. The amplitude is clamped to `[0, MAX_NOISE_AMPLITUDE]`;
/// NaN means no noise.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticBenchmark {
    market_return_annual: f64,
    noise_amplitude: f64,
    seed: Option<u64>,
}

impl SyntheticBenchmark {
    /// Create a synthetic benchmark.
    #[must_use]
    pub fn new(market_return_annual: f64, noise_amplitude: f64, seed: Option<u64>) -> Self {
        let noise_amplitude = if noise_amplitude.is_nan() {
            0.0
        } else {
            noise_amplitude.clamp(0.0, MAX_NOISE_AMPLITUDE)
        };
        Self {
            market_return_annual,
            noise_amplitude,
            seed,
        }
    }

    /// Set the noise seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn generate<R: Rng>(&self, rng: &mut R, months: usize) -> Vec<f64> {
        let drift = self.market_return_annual / MONTHS_PER_YEAR;
        let amplitude = self.noise_amplitude;
        (0..months)
            .map(|_| {
                if amplitude > 0.0 {
                    drift + rng.random_range(-amplitude..=amplitude)
                } else {
                    drift
                }
            })
            .collect()
    }
}

impl Default for SyntheticBenchmark {
    fn default() -> Self {
        Self::new(0.08, 0.01, None)
    }
}

impl BenchmarkReturnProvider for SyntheticBenchmark {
    fn monthly_returns(&self, months: usize) -> Vec<f64> {
        match self.seed {
            Some(seed) => self.generate(&mut StdRng::seed_from_u64(seed), months),
            None => self.generate(&mut rand::rng(), months),
        }
    }
}

/// Replays caller-supplied benchmark returns (e.g., a real index).
///
/// The most recent `months` values are used; shorter histories are cycled
/// from the start to fill the window. The history must be non-empty and
/// finite.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedBenchmark {
    returns: Vec<f64>,
}

impl FixedBenchmark {
    /// Create from observed returns, oldest first.
    pub fn new(returns: Vec<f64>) -> Result<Self> {
        if returns.is_empty() {
            return Err(RiskAnalysisError::insufficient_data(
                "benchmark",
                "fixed benchmark needs at least one return",
            ));
        }
        if let Some(idx) = returns.iter().position(|r| !r.is_finite()) {
            return Err(RiskAnalysisError::insufficient_data(
                "benchmark",
                format!("benchmark return {idx} is not finite"),
            ));
        }
        Ok(Self { returns })
    }
}

impl BenchmarkReturnProvider for FixedBenchmark {
    fn monthly_returns(&self, months: usize) -> Vec<f64> {
        if self.returns.len() >= months {
            return self.returns[self.returns.len() - months..].to_vec();
        }
        self.returns.iter().copied().cycle().take(months).collect()
    }
}

/// Aligned portfolio and benchmark return series.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    /// Monthly portfolio returns, oldest first.
    pub portfolio: Vec<f64>,
    /// Monthly benchmark returns, same length.
    pub benchmark: Vec<f64>,
}

impl ReturnSeries {
    /// Pair two series, checking they are aligned and long enough for
    /// second moments.
    pub fn new(portfolio: Vec<f64>, benchmark: Vec<f64>) -> Result<Self> {
        if portfolio.len() != benchmark.len() {
            return Err(RiskAnalysisError::insufficient_data(
                "return_series",
                format!(
                    "portfolio ({}) and benchmark ({}) series differ in length",
                    portfolio.len(),
                    benchmark.len()
                ),
            ));
        }
        if portfolio.len() < 2 {
            return Err(RiskAnalysisError::insufficient_data(
                "return_series",
                format!("need at least 2 periods, got {}", portfolio.len()),
            ));
        }
        if portfolio.iter().chain(&benchmark).any(|r| !r.is_finite()) {
            return Err(RiskAnalysisError::insufficient_data(
                "return_series",
                "series contains a non-finite return",
            ));
        }
        Ok(Self {
            portfolio,
            benchmark,
        })
    }

    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.portfolio.len()
    }

    /// Whether the series is empty (never true for a constructed series).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.portfolio.is_empty()
    }
}

/// Builds the trailing return window for a portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnSeriesBuilder {
    trailing_months: usize,
}

impl Default for ReturnSeriesBuilder {
    fn default() -> Self {
        Self::new(12)
    }
}

impl ReturnSeriesBuilder {
    /// Create a builder for a window of `trailing_months`, capped at
    /// [`MAX_TRAILING_MONTHS`].
    #[must_use]
    pub const fn new(trailing_months: usize) -> Self {
        let trailing_months = if trailing_months > MAX_TRAILING_MONTHS {
            MAX_TRAILING_MONTHS
        } else {
            trailing_months
        };
        Self { trailing_months }
    }

    /// Build both series for `portfolio`.
    ///
    /// Uses the portfolio's historical returns when present, the synthetic
    /// constant-rate series otherwise.
    pub fn build(
        &self,
        portfolio: &Portfolio,
        benchmark: &dyn BenchmarkReturnProvider,
    ) -> Result<ReturnSeries> {
        if portfolio.properties.is_empty() || portfolio.total_value_f64() <= 0.0 {
            return Err(RiskAnalysisError::insufficient_data(
                "portfolio_returns",
                "portfolio needs at least one property and a positive total value",
            ));
        }

        match &portfolio.historical_returns {
            Some(history) => self.build_from_history(history, benchmark),
            None => {
                let monthly = Self::synthetic_monthly_return(portfolio);
                debug!(
                    portfolio_id = %portfolio.id,
                    monthly_return = monthly,
                    months = self.trailing_months,
                    "Built synthetic constant-rate return series"
                );
                ReturnSeries::new(
                    vec![monthly; self.trailing_months],
                    benchmark.monthly_returns(self.trailing_months),
                )
            }
        }
    }

    /// Build from observed per-period returns, keeping the trailing window.
    pub fn build_from_history(
        &self,
        history: &[f64],
        benchmark: &dyn BenchmarkReturnProvider,
    ) -> Result<ReturnSeries> {
        let start = history.len().saturating_sub(self.trailing_months);
        let portfolio = history[start..].to_vec();
        let benchmark = benchmark.monthly_returns(portfolio.len());
        ReturnSeries::new(portfolio, benchmark)
    }

    /// Value-weighted monthly return: Σ (pct / 100 / 12) × (value / total).
    #[must_use]
    pub fn synthetic_monthly_return(portfolio: &Portfolio) -> f64 {
        portfolio
            .properties
            .iter()
            .zip(portfolio.holding_weights())
            .map(|(p, w)| p.total_return_percentage / 100.0 / MONTHS_PER_YEAR * w)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AssetAllocation, AssetClass, PortfolioProperty, PropertyMetadata, PropertyType,
    };
    use crate::error::ErrorCode;
    use rust_decimal_macros::dec;

    fn two_property_portfolio() -> Portfolio {
        let meta = PropertyMetadata::new(PropertyType::Residential);
        Portfolio::new(
            "pf-returns",
            dec!(1000000),
            vec![
                PortfolioProperty::new(dec!(500000), 8.0, meta.clone()),
                PortfolioProperty::new(dec!(500000), -2.0, meta),
            ],
            AssetAllocation::single(AssetClass::Residential),
        )
    }

    #[test]
    fn test_synthetic_monthly_return() {
        // (0.08/12)*0.5 + (-0.02/12)*0.5 = 0.0025
        let monthly = ReturnSeriesBuilder::synthetic_monthly_return(&two_property_portfolio());
        assert!((monthly - 0.0025).abs() < 1e-12);
    }

    #[test]
    fn test_build_synthetic_series() {
        let benchmark = SyntheticBenchmark::default().with_seed(1);
        let series = ReturnSeriesBuilder::new(12)
            .build(&two_property_portfolio(), &benchmark)
            .unwrap();

        assert_eq!(series.len(), 12);
        assert_eq!(series.benchmark.len(), 12);
        assert!(series.portfolio.iter().all(|r| (r - 0.0025).abs() < 1e-12));
    }

    #[test]
    fn test_build_uses_history_when_present() {
        let portfolio = two_property_portfolio()
            .with_historical_returns(vec![0.5, 0.01, -0.02, 0.03, 0.0]);
        let series = ReturnSeriesBuilder::new(4)
            .build(&portfolio, &SyntheticBenchmark::default().with_seed(3))
            .unwrap();

        assert_eq!(series.portfolio, vec![0.01, -0.02, 0.03, 0.0]);
        assert_eq!(series.benchmark.len(), 4);
    }

    #[test]
    fn test_short_history_is_insufficient() {
        let portfolio = two_property_portfolio().with_historical_returns(vec![0.01]);
        let err = ReturnSeriesBuilder::new(12)
            .build(&portfolio, &SyntheticBenchmark::default())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientData);
    }

    #[test]
    fn test_empty_portfolio_is_insufficient() {
        let mut portfolio = two_property_portfolio();
        portfolio.properties.clear();
        let err = ReturnSeriesBuilder::default()
            .build(&portfolio, &SyntheticBenchmark::default())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientData);
    }

    #[test]
    fn test_seeded_benchmark_is_reproducible() {
        let benchmark = SyntheticBenchmark::new(0.08, 0.01, Some(42));
        assert_eq!(benchmark.monthly_returns(12), benchmark.monthly_returns(12));
    }

    #[test]
    fn test_benchmark_noise_bounds() {
        let benchmark = SyntheticBenchmark::new(0.12, 0.01, Some(7));
        for r in benchmark.monthly_returns(240) {
            assert!((-1e-12..=0.02 + 1e-12).contains(&r), "{r} outside drift ± amplitude");
        }
    }

    #[test]
    fn test_noiseless_benchmark_is_constant() {
        let benchmark = SyntheticBenchmark::new(0.06, 0.0, None);
        assert!(benchmark.monthly_returns(6).iter().all(|r| (r - 0.005).abs() < 1e-15));
    }

    #[test]
    fn test_fixed_benchmark_takes_trailing_window() {
        let benchmark = FixedBenchmark::new(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(benchmark.monthly_returns(2), vec![3.0, 4.0]);
        assert_eq!(benchmark.monthly_returns(6), vec![1.0, 2.0, 3.0, 4.0, 1.0, 2.0]);
    }

    #[test]
    fn test_fixed_benchmark_rejects_empty_history() {
        let Err(err) = FixedBenchmark::new(Vec::new()) else {
            panic!("expected empty history to be rejected");
        };
        assert_eq!(err.code(), ErrorCode::InsufficientData);
        assert!(err.to_string().contains("benchmark"));
    }

    #[test]
    fn test_fixed_benchmark_rejects_non_finite_history() {
        let Err(err) = FixedBenchmark::new(vec![0.01, f64::NAN]) else {
            panic!("expected NaN history to be rejected");
        };
        assert_eq!(err.code(), ErrorCode::InsufficientData);
    }

    #[test]
    fn test_huge_noise_amplitude_is_clamped() {
        let benchmark = SyntheticBenchmark::new(0.08, 1.0e308, Some(1));
        let returns = benchmark.monthly_returns(12);

        assert_eq!(returns.len(), 12);
        let drift = 0.08 / 12.0;
        for r in returns {
            assert!(r.is_finite());
            assert!((r - drift).abs() <= MAX_NOISE_AMPLITUDE + 1e-12);
        }
    }

    #[test]
    fn test_nan_noise_amplitude_means_no_noise() {
        let benchmark = SyntheticBenchmark::new(0.06, f64::NAN, Some(1));
        assert!(benchmark.monthly_returns(6).iter().all(|r| (r - 0.005).abs() < 1e-15));
    }

    #[test]
    fn test_misaligned_series_rejected() {
        assert!(ReturnSeries::new(vec![0.1, 0.2], vec![0.1]).is_err());
    }

    #[test]
    fn test_window_is_capped() {
        let series = ReturnSeriesBuilder::new(usize::MAX)
            .build(&two_property_portfolio(), &SyntheticBenchmark::default().with_seed(2))
            .unwrap();
        assert_eq!(series.len(), MAX_TRAILING_MONTHS);
    }

    #[test]
    fn test_non_finite_series_rejected() {
        let err = ReturnSeries::new(vec![0.1, f64::INFINITY], vec![0.1, 0.2]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientData);
    }
}
