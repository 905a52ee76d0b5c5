//! Quantitative risk statistics.
//!
//! Implements the statistics reported in [`RiskMetrics`]:
//! - Volatility, beta, correlation and tracking error against the benchmark
//! - Sharpe, Sortino, Calmar and information ratios
//! - Historical-simulation VaR and expected shortfall
//! - Maximum drawdown of the cumulative return curve
//! - Holding-level and allocation-level Herfindahl indices
//!
//! Inputs are monthly; only the Calmar numerator is annualized (× 12).

use tracing::debug;

use super::math::{
    EPSILON, covariance, difference, herfindahl, historical_quantile, max_drawdown, mean, std_dev,
    variance,
};
use super::returns::ReturnSeries;
use crate::config::AnalysisConfig;
use crate::domain::{Portfolio, RiskMetrics};
use crate::error::{Result, RiskAnalysisError};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Computes [`RiskMetrics`] from a return series and portfolio snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskMetricsCalculator {
    risk_free_rate_annual: f64,
    var_confidence: f64,
    strict_ratios: bool,
}

impl Default for RiskMetricsCalculator {
    fn default() -> Self {
        Self::new(0.02, 0.05)
    }
}

impl RiskMetricsCalculator {
    /// Create a calculator with the given risk-free rate and VaR tail.
    #[must_use]
    pub const fn new(risk_free_rate_annual: f64, var_confidence: f64) -> Self {
        Self {
            risk_free_rate_annual,
            var_confidence,
            strict_ratios: false,
        }
    }

    /// Create a calculator from analysis configuration.
    #[must_use]
    pub const fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            risk_free_rate_annual: config.risk_free_rate_annual,
            var_confidence: config.var_confidence,
            strict_ratios: config.strict_ratios,
        }
    }

    /// Fail on zero ratio denominators instead of reporting `None`.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict_ratios = strict;
        self
    }

    /// Calculate all metrics.
    ///
    /// # Errors
    ///
    /// `InsufficientData` when the benchmark series has zero variance, when
    /// the VaR tail is outside `(0, 0.5]`, or, in strict mode, when any ratio
    /// denominator is zero.
    pub fn calculate(&self, series: &ReturnSeries, portfolio: &Portfolio) -> Result<RiskMetrics> {
        let returns = &series.portfolio;
        let benchmark = &series.benchmark;

        let mean_return = required("mean_return", mean(returns))?;
        let volatility = required("volatility", std_dev(returns))?;
        let beta = Self::beta(returns, benchmark)?;

        let monthly_rf = self.risk_free_rate_annual / MONTHS_PER_YEAR;
        let excess = mean_return - monthly_rf;

        let sharpe_ratio = self.ratio("sharpe_ratio", excess, volatility)?;

        let losses: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        let downside_volatility = std_dev(&losses).unwrap_or(0.0);
        let sortino_ratio = self.ratio("sortino_ratio", excess, downside_volatility)?;

        let maximum_drawdown = max_drawdown(returns);
        let total_return: f64 = returns.iter().sum();
        let calmar_ratio = self.ratio(
            "calmar_ratio",
            total_return * MONTHS_PER_YEAR,
            maximum_drawdown.abs(),
        )?;

        let active = difference(returns, benchmark);
        let tracking_error = required("tracking_error", std_dev(&active))?;
        let mean_active = required("information_ratio", mean(&active))?;
        let information_ratio = self.ratio("information_ratio", mean_active, tracking_error)?;

        let correlation_with_market = self
            .ratio(
                "correlation_with_market",
                required("correlation_with_market", covariance(returns, benchmark))?,
                volatility * required("correlation_with_market", std_dev(benchmark))?,
            )?
            .map(|c| c.clamp(-1.0, 1.0));

        let valid_tail = self.var_confidence > 0.0 && self.var_confidence <= 0.5;
        if !valid_tail {
            return Err(RiskAnalysisError::insufficient_data(
                "value_at_risk",
                format!("var_confidence must be in (0, 0.5], got {}", self.var_confidence),
            ));
        }
        let value_at_risk = required(
            "value_at_risk",
            historical_quantile(returns, self.var_confidence),
        )?;
        let tail: Vec<f64> = returns
            .iter()
            .copied()
            .filter(|r| *r <= value_at_risk)
            .collect();
        let expected_shortfall = mean(&tail).unwrap_or(value_at_risk);
        let value_at_risk_amount = (-value_at_risk).max(0.0) * portfolio.total_value_f64();

        let concentration_index = herfindahl(&portfolio.holding_weights());
        let herfindahl_index = herfindahl(&portfolio.current_allocation.weights());

        debug!(
            portfolio_id = %portfolio.id,
            volatility,
            beta,
            value_at_risk,
            maximum_drawdown,
            concentration_index,
            "Calculated risk metrics"
        );

        Ok(RiskMetrics {
            volatility,
            mean_return,
            annualized_return: mean_return * MONTHS_PER_YEAR,
            beta,
            correlation_with_market,
            sharpe_ratio,
            sortino_ratio,
            calmar_ratio,
            information_ratio,
            tracking_error,
            value_at_risk,
            value_at_risk_amount,
            expected_shortfall,
            maximum_drawdown,
            concentration_index,
            herfindahl_index,
        })
    }

    /// cov(portfolio, benchmark) / var(benchmark).
    ///
    /// # Errors
    ///
    /// `InsufficientData` when the benchmark has zero variance.
    pub fn beta(returns: &[f64], benchmark: &[f64]) -> Result<f64> {
        let benchmark_variance = required("beta", variance(benchmark))?;
        if benchmark_variance <= EPSILON * EPSILON {
            return Err(RiskAnalysisError::insufficient_data(
                "beta",
                "benchmark variance is zero",
            ));
        }
        let cov = required("beta", covariance(returns, benchmark))?;
        Ok(cov / benchmark_variance)
    }

    fn ratio(&self, metric: &str, numerator: f64, denominator: f64) -> Result<Option<f64>> {
        if denominator.abs() <= EPSILON {
            if self.strict_ratios {
                return Err(RiskAnalysisError::insufficient_data(
                    metric,
                    "denominator is zero",
                ));
            }
            return Ok(None);
        }
        Ok(Some(numerator / denominator))
    }
}

fn required(metric: &str, value: Option<f64>) -> Result<f64> {
    value.ok_or_else(|| RiskAnalysisError::insufficient_data(metric, "return series is empty"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::math::median;
    use crate::domain::{
        AssetAllocation, AssetClass, PortfolioProperty, PropertyMetadata, PropertyType,
    };
    use crate::error::ErrorCode;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn portfolio_with_values(values: &[Decimal]) -> Portfolio {
        let total: Decimal = values.iter().sum();
        let properties = values
            .iter()
            .map(|v| {
                PortfolioProperty::new(*v, 6.0, PropertyMetadata::new(PropertyType::Residential))
            })
            .collect();
        Portfolio::new(
            "pf-metrics",
            total,
            properties,
            AssetAllocation::single(AssetClass::Residential),
        )
    }

    fn sample_series() -> ReturnSeries {
        ReturnSeries::new(
            vec![0.02, -0.01, 0.015, -0.03, 0.01, 0.005, 0.02, -0.005, 0.01, 0.0, -0.02, 0.025],
            vec![0.01, -0.005, 0.01, -0.02, 0.008, 0.004, 0.012, 0.0, 0.006, 0.002, -0.01, 0.015],
        )
        .unwrap()
    }

    #[test]
    fn test_identical_series() {
        let returns = vec![0.01, -0.02, 0.03, 0.0, 0.015, -0.005];
        let series = ReturnSeries::new(returns.clone(), returns).unwrap();
        let metrics = RiskMetricsCalculator::default()
            .calculate(&series, &portfolio_with_values(&[dec!(100)]))
            .unwrap();

        assert!((metrics.beta - 1.0).abs() < 1e-9);
        assert!((metrics.correlation_with_market.unwrap() - 1.0).abs() < 1e-9);
        assert!(metrics.tracking_error.abs() < 1e-12);
        assert!(metrics.information_ratio.is_none());
    }

    #[test]
    fn test_known_values() {
        let series = sample_series();
        let metrics = RiskMetricsCalculator::default()
            .calculate(&series, &portfolio_with_values(&[dec!(1000000)]))
            .unwrap();

        let expected_mean = 0.04 / 12.0;
        assert!((metrics.mean_return - expected_mean).abs() < 1e-12);
        assert!((metrics.annualized_return - 0.04).abs() < 1e-12);
        // floor(0.05 * 12) = 0 -> worst month
        assert!((metrics.value_at_risk + 0.03).abs() < 1e-12);
        assert!((metrics.expected_shortfall + 0.03).abs() < 1e-12);
        assert!((metrics.value_at_risk_amount - 30_000.0).abs() < 1e-6);
        assert!(metrics.beta > 0.0);
        assert!(metrics.sharpe_ratio.unwrap() > 0.0);
        assert!(metrics.sortino_ratio.is_some());
        assert!(metrics.calmar_ratio.is_some());
    }

    #[test]
    fn test_sharpe_formula() {
        let series = sample_series();
        let metrics = RiskMetricsCalculator::new(0.02, 0.05)
            .calculate(&series, &portfolio_with_values(&[dec!(1)]))
            .unwrap();

        let vol = std_dev(&series.portfolio).unwrap();
        let expected = (mean(&series.portfolio).unwrap() - 0.02 / 12.0) / vol;
        assert!((metrics.sharpe_ratio.unwrap() - expected).abs() < 1e-12);
        assert!((metrics.volatility - vol).abs() < 1e-15);
    }

    #[test]
    fn test_calmar_formula() {
        let series = sample_series();
        let metrics = RiskMetricsCalculator::default()
            .calculate(&series, &portfolio_with_values(&[dec!(1)]))
            .unwrap();

        let total: f64 = series.portfolio.iter().sum();
        let expected = total * 12.0 / max_drawdown(&series.portfolio);
        assert!((metrics.calmar_ratio.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_sortino_uses_downside_deviation_of_losses() {
        let metrics = RiskMetricsCalculator::new(0.02, 0.05)
            .calculate(&sample_series(), &portfolio_with_values(&[dec!(1)]))
            .unwrap();

        // Losses: [-0.01, -0.03, -0.005, -0.02], mean -0.01625.
        let downside = ((0.00625f64.powi(2)
            + 0.01375f64.powi(2)
            + 0.01125f64.powi(2)
            + 0.00375f64.powi(2))
            / 4.0)
            .sqrt();
        let excess = 0.04 / 12.0 - 0.02 / 12.0;
        let sortino = metrics.sortino_ratio.unwrap();
        assert!((sortino - excess / downside).abs() < 1e-9);
        assert!((sortino - 0.173_585_214_641_098_5).abs() < 1e-9);

        // Root-mean-square of losses over all 12 months is a different statistic.
        let rms_over_all = (0.001_425f64 / 12.0).sqrt();
        assert!((sortino - excess / rms_over_all).abs() > 1e-3);
    }

    #[test]
    fn test_tracking_error_and_information_ratio() {
        let metrics = RiskMetricsCalculator::default()
            .calculate(&sample_series(), &portfolio_with_values(&[dec!(1)]))
            .unwrap();

        let active = [
            0.01, -0.005, 0.005, -0.01, 0.002, 0.001, 0.008, -0.005, 0.004, -0.002, -0.01, 0.01,
        ];
        let mean_active = 0.008 / 12.0;
        let tracking_error = (active
            .iter()
            .map(|a| (a - mean_active) * (a - mean_active))
            .sum::<f64>()
            / 12.0)
            .sqrt();

        assert!((metrics.tracking_error - tracking_error).abs() < 1e-12);
        assert!((metrics.tracking_error - 0.006_823_163_163_486_239).abs() < 1e-12);
        assert!((metrics.information_ratio.unwrap() - mean_active / tracking_error).abs() < 1e-9);
        assert!((metrics.information_ratio.unwrap() - 0.097_706_393_749_206_31).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_and_beta_values() {
        let series = sample_series();
        let metrics = RiskMetricsCalculator::default()
            .calculate(&series, &portfolio_with_values(&[dec!(1)]))
            .unwrap();

        let n = 12.0;
        let mean_p: f64 = series.portfolio.iter().sum::<f64>() / n;
        let mean_b: f64 = series.benchmark.iter().sum::<f64>() / n;
        let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
        for (x, y) in series.portfolio.iter().zip(&series.benchmark) {
            sxy += (x - mean_p) * (y - mean_b);
            sxx += (x - mean_p) * (x - mean_p);
            syy += (y - mean_b) * (y - mean_b);
        }

        let correlation = metrics.correlation_with_market.unwrap();
        assert!((correlation - sxy / (sxx * syy).sqrt()).abs() < 1e-9);
        assert!((correlation - 0.988_257_997_120_097).abs() < 1e-9);
        assert!((metrics.beta - sxy / syy).abs() < 1e-9);
        assert!((metrics.beta - 1.655_345_540_460_721).abs() < 1e-9);
    }

    #[test]
    fn test_calmar_known_value() {
        // Cumulative path peaks at 0.025 then falls to -0.005: drawdown 0.03.
        let metrics = RiskMetricsCalculator::default()
            .calculate(&sample_series(), &portfolio_with_values(&[dec!(1)]))
            .unwrap();

        assert!((metrics.maximum_drawdown - 0.03).abs() < 1e-12);
        assert!((metrics.calmar_ratio.unwrap() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_expected_shortfall_averages_tail() {
        // 40 evenly spaced returns from 0.0185 down to -0.0205.
        let returns: Vec<f64> = (0..40_i32).rev().map(|i| (f64::from(i) - 20.5) / 1000.0).collect();
        let benchmark: Vec<f64> = (0..40)
            .map(|i| if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();
        let series = ReturnSeries::new(returns, benchmark).unwrap();

        let metrics = RiskMetricsCalculator::new(0.02, 0.05)
            .calculate(&series, &portfolio_with_values(&[dec!(1000)]))
            .unwrap();

        // floor(0.05 * 40) = 2 -> third-worst month.
        assert!((metrics.value_at_risk + 0.0185).abs() < 1e-12);
        // Mean of the three worst months.
        assert!((metrics.expected_shortfall + 0.0195).abs() < 1e-12);
        assert!(metrics.expected_shortfall < metrics.value_at_risk);
        assert!((metrics.value_at_risk_amount - 18.5).abs() < 1e-9);
    }

    #[test]
    fn test_nan_var_confidence_rejected() {
        let err = RiskMetricsCalculator::new(0.02, f64::NAN)
            .calculate(&sample_series(), &portfolio_with_values(&[dec!(1)]))
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InsufficientData);
        assert!(err.to_string().contains("var_confidence"));
    }

    #[test]
    fn test_constant_portfolio_ratios_are_none() {
        let series = ReturnSeries::new(vec![0.0025; 12], vec![
            0.01, 0.002, 0.008, 0.0, 0.012, 0.004, 0.006, 0.009, 0.003, 0.007, 0.011, 0.005,
        ])
        .unwrap();
        let metrics = RiskMetricsCalculator::default()
            .calculate(&series, &portfolio_with_values(&[dec!(500000), dec!(500000)]))
            .unwrap();

        assert!(metrics.volatility < 1e-12);
        assert!(metrics.beta.abs() < 1e-12);
        assert!(metrics.sharpe_ratio.is_none());
        assert!(metrics.sortino_ratio.is_none());
        assert!(metrics.calmar_ratio.is_none());
        assert!(metrics.correlation_with_market.is_none());
        assert_eq!(metrics.maximum_drawdown, 0.0);
        assert_eq!(metrics.value_at_risk_amount, 0.0);
        assert!((metrics.concentration_index - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_strict_mode_rejects_zero_volatility() {
        let series = ReturnSeries::new(vec![0.0025; 6], vec![0.01, 0.0, 0.02, 0.005, 0.0, 0.01])
            .unwrap();
        let err = RiskMetricsCalculator::default()
            .strict(true)
            .calculate(&series, &portfolio_with_values(&[dec!(1)]))
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InsufficientData);
        assert!(err.to_string().contains("sharpe_ratio"));
    }

    #[test]
    fn test_zero_benchmark_variance_rejected() {
        let series = ReturnSeries::new(vec![0.01, 0.02, 0.03], vec![0.005; 3]).unwrap();
        let err = RiskMetricsCalculator::default()
            .calculate(&series, &portfolio_with_values(&[dec!(1)]))
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InsufficientData);
        assert!(err.to_string().contains("beta"));
    }

    #[test]
    fn test_herfindahl_index_over_allocation() {
        let mut portfolio = portfolio_with_values(&[dec!(1)]);
        portfolio.current_allocation = AssetAllocation {
            residential: 0.5,
            commercial: 0.3,
            land: 0.2,
            ..Default::default()
        };
        let metrics = RiskMetricsCalculator::default()
            .calculate(&sample_series(), &portfolio)
            .unwrap();

        assert!((metrics.herfindahl_index - 0.38).abs() < 1e-12);
    }

    #[test]
    fn test_single_property_concentration() {
        let metrics = RiskMetricsCalculator::default()
            .calculate(&sample_series(), &portfolio_with_values(&[dec!(750000)]))
            .unwrap();
        assert!((metrics.concentration_index - 1.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn equal_values_concentration_is_reciprocal(n in 1usize..40, value in 1u32..5_000_000) {
            let values = vec![Decimal::from(value); n];
            let metrics = RiskMetricsCalculator::default()
                .calculate(&sample_series(), &portfolio_with_values(&values))
                .unwrap();
            prop_assert!((metrics.concentration_index - 1.0 / n as f64).abs() < 1e-9);
        }

        #[test]
        fn concentration_is_bounded(values in prop::collection::vec(1u32..1_000_000, 1..30)) {
            let values: Vec<Decimal> = values.into_iter().map(Decimal::from).collect();
            let n = values.len() as f64;
            let metrics = RiskMetricsCalculator::default()
                .calculate(&sample_series(), &portfolio_with_values(&values))
                .unwrap();
            prop_assert!(metrics.concentration_index >= 1.0 / n - 1e-9);
            prop_assert!(metrics.concentration_index <= 1.0 + 1e-9);
        }

        #[test]
        fn drawdown_non_negative_and_var_below_median(
            returns in prop::collection::vec(-0.2f64..0.2, 2..60),
        ) {
            let benchmark: Vec<f64> = (0..returns.len())
                .map(|i| if i % 2 == 0 { 0.01 } else { -0.01 })
                .collect();
            let series = ReturnSeries::new(returns.clone(), benchmark).unwrap();
            let metrics = RiskMetricsCalculator::default()
                .calculate(&series, &portfolio_with_values(&[dec!(1000)]))
                .unwrap();

            prop_assert!(metrics.maximum_drawdown >= 0.0);
            prop_assert!(metrics.value_at_risk <= median(&returns).unwrap());
            prop_assert!(metrics.expected_shortfall <= metrics.value_at_risk + 1e-12);
            prop_assert!(metrics.value_at_risk_amount >= 0.0);
        }
    }
}
