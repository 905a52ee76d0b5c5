//! Quantitative risk statistics.

use serde::{Deserialize, Serialize};

/// Statistics computed from the monthly portfolio and benchmark return
/// series plus the allocation snapshot.
///
/// All return-based values are monthly unless noted. Ratios whose
/// denominator is zero are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Population standard deviation of portfolio returns.
    pub volatility: f64,
    /// Mean monthly portfolio return.
    pub mean_return: f64,
    /// Mean monthly return × 12.
    pub annualized_return: f64,
    /// cov(portfolio, benchmark) / var(benchmark).
    pub beta: f64,
    /// Pearson correlation with the benchmark.
    pub correlation_with_market: Option<f64>,
    /// Excess return over total volatility.
    pub sharpe_ratio: Option<f64>,
    /// Excess return over downside volatility.
    pub sortino_ratio: Option<f64>,
    /// Annualized return over maximum drawdown.
    pub calmar_ratio: Option<f64>,
    /// Mean active return over tracking error.
    pub information_ratio: Option<f64>,
    /// Volatility of active returns.
    pub tracking_error: f64,
    /// Historical-simulation VaR (a return, negative for a loss).
    pub value_at_risk: f64,
    /// Loss at the VaR quantile in currency units (`max(0, -VaR) × total value`).
    pub value_at_risk_amount: f64,
    /// Mean of returns at or below VaR.
    pub expected_shortfall: f64,
    /// Largest peak-to-trough fall of the cumulative return curve (≥ 0).
    pub maximum_drawdown: f64,
    /// Herfindahl index over holding values.
    pub concentration_index: f64,
    /// Herfindahl index over the six allocation weights.
    pub herfindahl_index: f64,
}
