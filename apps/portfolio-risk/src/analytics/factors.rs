//! Qualitative risk factors scored from portfolio structure.
//!
//! Five axes are scored: market (beta), concentration (holding Herfindahl),
//! liquidity (share of value not tagged highly liquid), credit (mean
//! loan-to-value) and operational (mean management complexity). Each score
//! is classified by a [`ThresholdLadder`]; axes above the low band produce a
//! [`RiskFactor`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::math::herfindahl;
use super::metrics::RiskMetricsCalculator;
use super::returns::ReturnSeries;
use crate::domain::{Impact, Portfolio, PortfolioProperty, PropertyType, RiskFactor, RiskFactorType};
use crate::error::Result;

/// Impact and probability assigned by a ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Severity band.
    pub impact: Impact,
    /// Probability for the band.
    pub probability: f64,
}

/// Ordered severity bands: the first band whose threshold the value
/// strictly exceeds wins; otherwise the floor applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdLadder {
    bands: [(f64, Impact, f64); 3],
    floor: Option<(Impact, f64)>,
}

impl ThresholdLadder {
    /// Critical/high/medium above the three thresholds, low otherwise, with
    /// probabilities 0.8/0.6/0.4/0.3.
    #[must_use]
    pub const fn standard(thresholds: [f64; 3]) -> Self {
        Self {
            bands: [
                (thresholds[0], Impact::Critical, 0.8),
                (thresholds[1], Impact::High, 0.6),
                (thresholds[2], Impact::Medium, 0.4),
            ],
            floor: Some((Impact::Low, 0.3)),
        }
    }

    /// High/medium/low above the three thresholds, negligible (no
    /// classification) otherwise.
    #[must_use]
    pub const fn capped_at_high(thresholds: [f64; 3]) -> Self {
        Self {
            bands: [
                (thresholds[0], Impact::High, 0.6),
                (thresholds[1], Impact::Medium, 0.4),
                (thresholds[2], Impact::Low, 0.3),
            ],
            floor: None,
        }
    }

    /// Classify a score. `None` means negligible.
    #[must_use]
    pub fn classify(&self, value: f64) -> Option<Classification> {
        self.bands
            .iter()
            .find(|(threshold, _, _)| value > *threshold)
            .map(|&(_, impact, probability)| (impact, probability))
            .or(self.floor)
            .map(|(impact, probability)| Classification {
                impact,
                probability,
            })
    }
}

/// Beta bands.
pub const MARKET_LADDER: ThresholdLadder = ThresholdLadder::standard([1.5, 1.2, 0.8]);
/// Holding concentration bands.
pub const CONCENTRATION_LADDER: ThresholdLadder = ThresholdLadder::standard([0.5, 0.3, 0.2]);
/// Illiquid share bands.
pub const LIQUIDITY_LADDER: ThresholdLadder = ThresholdLadder::standard([0.8, 0.6, 0.4]);
/// Mean loan-to-value bands.
pub const CREDIT_LADDER: ThresholdLadder = ThresholdLadder::standard([0.8, 0.6, 0.4]);
/// Operational complexity bands.
pub const OPERATIONAL_LADDER: ThresholdLadder = ThresholdLadder::capped_at_high([0.7, 0.5, 0.3]);

/// Raw axis scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    /// Beta against the benchmark.
    pub market: f64,
    /// Holding-level Herfindahl index.
    pub concentration: f64,
    /// Share of value not tagged as highly liquid.
    pub liquidity: f64,
    /// Mean loan-to-value.
    pub credit: f64,
    /// Mean operational complexity.
    pub operational: f64,
}

/// Scores plus the factors they produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorAssessment {
    /// Raw axis scores.
    pub scores: FactorScores,
    /// Factors above the low band, in axis order.
    pub factors: Vec<RiskFactor>,
}

/// Identifies qualitative risk factors.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskFactorIdentifier;

impl RiskFactorIdentifier {
    /// Score every axis and collect the resulting factors.
    ///
    /// Only the market axis reads the return series (for beta); the other
    /// axes use portfolio structure alone.
    ///
    /// # Errors
    ///
    /// `InsufficientData` when beta is undefined (zero benchmark variance).
    pub fn identify(portfolio: &Portfolio, series: &ReturnSeries) -> Result<FactorAssessment> {
        let scores = FactorScores {
            market: RiskMetricsCalculator::beta(&series.portfolio, &series.benchmark)?,
            concentration: herfindahl(&portfolio.holding_weights()),
            liquidity: Self::illiquid_share(portfolio),
            credit: Self::mean_loan_to_value(portfolio),
            operational: Self::mean_operational_complexity(portfolio),
        };

        let factors = [
            market_factor(scores.market),
            concentration_factor(scores.concentration),
            liquidity_factor(scores.liquidity),
            credit_factor(scores.credit),
            operational_factor(scores.operational),
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(FactorAssessment { scores, factors })
    }

    /// `1 - (value tagged highly liquid / total value)`.
    #[must_use]
    pub fn illiquid_share(portfolio: &Portfolio) -> f64 {
        let total = portfolio.total_value_f64();
        if total <= 0.0 {
            return 1.0;
        }
        let liquid: f64 = portfolio
            .properties
            .iter()
            .filter(|p| p.is_highly_liquid())
            .map(PortfolioProperty::current_value_f64)
            .sum();
        (1.0 - liquid / total).clamp(0.0, 1.0)
    }

    /// Mean loan-to-value across holdings (0 for holdings without a loan).
    #[must_use]
    pub fn mean_loan_to_value(portfolio: &Portfolio) -> f64 {
        mean_of(portfolio, PortfolioProperty::loan_to_value)
    }

    /// Mean operational complexity across holdings.
    #[must_use]
    pub fn mean_operational_complexity(portfolio: &Portfolio) -> f64 {
        mean_of(portfolio, operational_complexity)
    }
}

/// Additive complexity score of one holding, capped at 1.0.
#[must_use]
pub fn operational_complexity(property: &PortfolioProperty) -> f64 {
    let meta = &property.property_metadata;
    let mut score = 0.0;
    if meta.property_type == PropertyType::Commercial {
        score += 0.3;
    }
    if meta.units.is_some_and(|units| units > 10) {
        score += 0.2;
    }
    if meta.age.is_some_and(|age| age > 20) {
        score += 0.2;
    }
    if property
        .monthly_rent
        .is_some_and(|rent| rent > Decimal::from(5000))
    {
        score += 0.1;
    }
    f64::min(score, 1.0)
}

fn mean_of(portfolio: &Portfolio, score: impl Fn(&PortfolioProperty) -> f64) -> f64 {
    if portfolio.properties.is_empty() {
        return 0.0;
    }
    portfolio.properties.iter().map(score).sum::<f64>() / portfolio.properties.len() as f64
}

fn build_factor(
    ladder: &ThresholdLadder,
    score: f64,
    factor_type: RiskFactorType,
    name: &str,
    description: String,
    mitigation: &[&str],
) -> Option<RiskFactor> {
    let classification = ladder.classify(score)?;
    if classification.impact <= Impact::Low {
        return None;
    }
    Some(RiskFactor {
        name: name.to_string(),
        factor_type,
        impact: classification.impact,
        probability: classification.probability,
        description,
        mitigation: mitigation.iter().map(|m| (*m).to_string()).collect(),
    })
}

fn market_factor(beta: f64) -> Option<RiskFactor> {
    build_factor(
        &MARKET_LADDER,
        beta,
        RiskFactorType::Market,
        "Market Risk",
        format!("Portfolio beta of {beta:.2} amplifies broad real-estate market movements"),
        &[
            "Diversify into property types with low market correlation",
            "Hedge with inverse REIT or interest-rate instruments",
            "Hold cash reserves to avoid forced sales in downturns",
        ],
    )
}

fn concentration_factor(index: f64) -> Option<RiskFactor> {
    build_factor(
        &CONCENTRATION_LADDER,
        index,
        RiskFactorType::Concentration,
        "Concentration Risk",
        format!("Holding concentration index of {index:.2}: value is concentrated in few properties"),
        &[
            "Add properties in different markets and asset classes",
            "Cap any single holding at a fixed share of portfolio value",
            "Use REITs for diversified exposure",
        ],
    )
}

fn liquidity_factor(illiquid: f64) -> Option<RiskFactor> {
    build_factor(
        &LIQUIDITY_LADDER,
        illiquid,
        RiskFactorType::Liquidity,
        "Liquidity Risk",
        format!(
            "{:.0}% of portfolio value sits in holdings that are not highly liquid",
            illiquid * 100.0
        ),
        &[
            "Increase allocation to liquid holdings such as REITs",
            "Keep a cash buffer for near-term obligations",
            "Arrange a standby credit facility",
        ],
    )
}

fn credit_factor(ltv: f64) -> Option<RiskFactor> {
    build_factor(
        &CREDIT_LADDER,
        ltv,
        RiskFactorType::Credit,
        "Credit Risk",
        format!("Average loan-to-value of {:.0}% leaves little equity cushion", ltv * 100.0),
        &[
            "Reduce leverage by paying down the highest-LTV loans",
            "Refinance into fixed-rate, longer-term debt",
            "Stress-test debt service coverage against rate rises",
        ],
    )
}

fn operational_factor(complexity: f64) -> Option<RiskFactor> {
    build_factor(
        &OPERATIONAL_LADDER,
        complexity,
        RiskFactorType::Operational,
        "Operational Risk",
        format!("Average operational complexity score of {complexity:.2}"),
        &[
            "Engage professional property management",
            "Standardize maintenance and tenant processes",
            "Adopt property management software for reporting",
        ],
    )
}
