//! Risk analysis report types.
//!
//! A [`RiskAnalysis`] is built fresh for every call to the analyzer and is
//! never mutated afterwards.

mod factor;
mod metrics;
mod recommendation;

pub use factor::{Impact, RiskFactor, RiskFactorType};
pub use self::metrics::RiskMetrics;
pub use recommendation::{Priority, RecommendationType, RiskRecommendation};

use serde::{Deserialize, Serialize};

use super::portfolio::PortfolioId;

/// Risk level classification of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Overall risk below 0.4.
    Low,
    /// Overall risk from 0.4 up to 0.7.
    Moderate,
    /// Overall risk of 0.7 or more.
    High,
}

impl RiskLevel {
    /// Classify an overall risk score in [0, 1].
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 0.4 {
            Self::Low
        } else if score < 0.7 {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Complete risk assessment of one portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    /// Portfolio the analysis was computed for.
    pub portfolio_id: PortfolioId,
    /// Composite score, clamped to [0, 1].
    pub overall_risk: f64,
    /// Beta scaled by the market beta (1.0).
    pub systematic_risk: f64,
    /// Portfolio variance not explained by the benchmark.
    pub unsystematic_risk: f64,
    /// Holding-level Herfindahl index.
    pub concentration_risk: f64,
    /// Share of value not tagged as highly liquid.
    pub liquidity_risk: f64,
    /// Beta against the benchmark.
    pub market_risk: f64,
    /// Mean loan-to-value across holdings.
    pub credit_risk: f64,
    /// Mean operational complexity across holdings.
    pub operational_risk: f64,
    /// Qualitative risk factors above the low band.
    pub risk_factors: Vec<RiskFactor>,
    /// Quantitative statistics.
    pub risk_metrics: RiskMetrics,
    /// Prioritized mitigation recommendations.
    pub recommendations: Vec<RiskRecommendation>,
}

impl RiskAnalysis {
    /// Classification of [`Self::overall_risk`].
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.overall_risk)
    }

    /// Number of factors with high or critical impact.
    #[must_use]
    pub fn high_severity_factor_count(&self) -> usize {
        self.risk_factors
            .iter()
            .filter(|f| f.impact.is_high_or_critical())
            .count()
    }

    /// Recommendations with the given priority.
    pub fn recommendations_with_priority(
        &self,
        priority: Priority,
    ) -> impl Iterator<Item = &RiskRecommendation> {
        self.recommendations
            .iter()
            .filter(move |r| r.priority == priority)
    }
}
