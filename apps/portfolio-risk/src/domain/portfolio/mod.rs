//! Portfolio snapshot supplied by the portfolio-management collaborator.
//!
//! The engine only reads these types. [`Portfolio::validate`] enforces the
//! input invariants before any statistic is computed.

mod allocation;
mod identifiers;
mod property;

pub use allocation::{AssetAllocation, AssetClass};
pub use identifiers::PortfolioId;
pub use property::{LiquidityTier, PortfolioProperty, PropertyMetadata, PropertyType};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskAnalysisError};

/// Absolute slack allowed between `total_value` and the sum of holdings.
const TOTAL_VALUE_ABS_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Relative slack allowed between `total_value` and the sum of holdings.
const TOTAL_VALUE_REL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// A collection of property holdings with its allocation snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Portfolio identifier; a random one is generated when the input
    /// omits it.
    #[serde(default = "PortfolioId::generate")]
    pub id: PortfolioId,
    /// Sum of all holding values.
    pub total_value: Decimal,
    /// Holdings, in the order supplied by the caller.
    pub properties: Vec<PortfolioProperty>,
    /// Current fractional weights per asset class.
    pub current_allocation: AssetAllocation,
    /// Optional target weights per asset class.
    #[serde(default)]
    pub target_allocation: Option<AssetAllocation>,
    /// Observed per-period (monthly) portfolio returns, oldest first.
    ///
    /// When present these replace the synthetic constant-rate series.
    #[serde(default)]
    pub historical_returns: Option<Vec<f64>>,
}

impl Portfolio {
    /// Create a portfolio without a target allocation or return history.
    #[must_use]
    pub fn new(
        id: impl Into<PortfolioId>,
        total_value: Decimal,
        properties: Vec<PortfolioProperty>,
        current_allocation: AssetAllocation,
    ) -> Self {
        Self {
            id: id.into(),
            total_value,
            properties,
            current_allocation,
            target_allocation: None,
            historical_returns: None,
        }
    }

    /// Set the target allocation.
    #[must_use]
    pub const fn with_target_allocation(mut self, target: AssetAllocation) -> Self {
        self.target_allocation = Some(target);
        self
    }

    /// Attach observed monthly returns (oldest first).
    #[must_use]
    pub fn with_historical_returns(mut self, returns: Vec<f64>) -> Self {
        self.historical_returns = Some(returns);
        self
    }

    /// Total value as `f64` for statistical work.
    #[must_use]
    pub fn total_value_f64(&self) -> f64 {
        self.total_value.to_f64().unwrap_or(0.0)
    }

    /// Weight of each holding in the portfolio (`current_value / total_value`).
    #[must_use]
    pub fn holding_weights(&self) -> Vec<f64> {
        let total = self.total_value_f64();
        if total <= 0.0 {
            return vec![0.0; self.properties.len()];
        }
        self.properties
            .iter()
            .map(|p| p.current_value_f64() / total)
            .collect()
    }

    /// Check the input invariants.
    ///
    /// Requires at least one holding, a positive total value, non-negative
    /// holding values that add up to the total (within a cent or one part per
    /// million, whichever is larger), finite returns, and current (and target,
    /// when set) finite allocation weights summing to 1.0 within `tolerance`.
    pub fn validate(&self, tolerance: f64) -> Result<()> {
        if self.properties.is_empty() {
            return Err(RiskAnalysisError::invalid_portfolio(
                "properties",
                "portfolio must contain at least one property",
            ));
        }

        if self.total_value <= Decimal::ZERO {
            return Err(RiskAnalysisError::invalid_portfolio(
                "total_value",
                format!("must be positive, got {}", self.total_value),
            ));
        }

        if let Some((idx, property)) = self
            .properties
            .iter()
            .enumerate()
            .find(|(_, p)| p.current_value < Decimal::ZERO)
        {
            return Err(RiskAnalysisError::invalid_portfolio(
                format!("properties[{idx}].current_value"),
                format!("must not be negative, got {}", property.current_value),
            ));
        }

        if let Some((idx, property)) = self
            .properties
            .iter()
            .enumerate()
            .find(|(_, p)| !p.total_return_percentage.is_finite())
        {
            return Err(RiskAnalysisError::invalid_portfolio(
                format!("properties[{idx}].total_return_percentage"),
                format!("must be finite, got {}", property.total_return_percentage),
            ));
        }

        self.check_total_value()?;

        check_allocation_sum("current_allocation", &self.current_allocation, tolerance)?;
        if let Some(target) = &self.target_allocation {
            check_allocation_sum("target_allocation", target, tolerance)?;
        }

        if let Some(returns) = &self.historical_returns {
            if returns.iter().any(|r| !r.is_finite()) {
                return Err(RiskAnalysisError::invalid_portfolio(
                    "historical_returns",
                    "returns must be finite",
                ));
            }
        }

        Ok(())
    }

    fn check_total_value(&self) -> Result<()> {
        let holdings = self
            .properties
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.current_value))
            .ok_or_else(|| {
                RiskAnalysisError::invalid_portfolio("properties", "holding values overflow")
            })?;

        let slack = (self.total_value * TOTAL_VALUE_REL_TOLERANCE).max(TOTAL_VALUE_ABS_TOLERANCE);
        if (self.total_value - holdings).abs() > slack {
            return Err(RiskAnalysisError::invalid_portfolio(
                "total_value",
                format!(
                    "must equal the sum of holding values ({holdings}), got {}",
                    self.total_value
                ),
            ));
        }
        Ok(())
    }
}

fn check_allocation_sum(field: &str, allocation: &AssetAllocation, tolerance: f64) -> Result<()> {
    if let Some((class, weight)) = AssetClass::ALL
        .iter()
        .map(|class| (class, allocation.weight(*class)))
        .find(|(_, w)| !w.is_finite())
    {
        return Err(RiskAnalysisError::invalid_portfolio(
            format!("{field}.{}", class.as_str()),
            format!("weight must be finite, got {weight}"),
        ));
    }

    let sum = allocation.sum();
    let within = (sum - 1.0).abs() <= tolerance;
    if !within {
        return Err(RiskAnalysisError::invalid_portfolio(
            field,
            format!("weights must sum to 1.0, got {sum:.6}"),
        ));
    }
    Ok(())
}
