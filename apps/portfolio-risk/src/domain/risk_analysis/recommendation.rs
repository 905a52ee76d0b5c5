//! Mitigation recommendations.

use serde::{Deserialize, Serialize};

/// Recommendation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    /// Spread value across more holdings or classes.
    Diversification,
    /// Reduce market sensitivity.
    RiskManagement,
    /// Move back toward the target allocation.
    Rebalancing,
    /// Protect against tail losses.
    Hedging,
}

impl RecommendationType {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Diversification => "diversification",
            Self::RiskManagement => "risk_management",
            Self::Rebalancing => "rebalancing",
            Self::Hedging => "hedging",
        }
    }
}

/// Recommendation urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Address when convenient.
    Low,
    /// Address soon.
    Medium,
    /// Address first.
    High,
}

/// An actionable recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRecommendation {
    /// Category.
    pub recommendation_type: RecommendationType,
    /// Urgency.
    pub priority: Priority,
    /// What the problem is.
    pub description: String,
    /// What to do about it.
    pub action: String,
    /// Estimated reduction in overall risk, in [0, 1].
    pub expected_impact: f64,
    /// Concrete implementation steps.
    pub implementation: Vec<String>,
}
