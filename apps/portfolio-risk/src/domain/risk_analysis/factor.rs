//! Qualitative risk factors.

use serde::{Deserialize, Serialize};

/// Severity of a risk factor. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    /// Minor.
    Low,
    /// Worth monitoring.
    Medium,
    /// Needs action.
    High,
    /// Needs immediate action.
    Critical,
}

impl Impact {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Whether the impact counts toward the overall risk score.
    #[must_use]
    pub const fn is_high_or_critical(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

/// Axis a risk factor was identified on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorType {
    /// Sensitivity to the broad market.
    Market,
    /// Value concentrated in few holdings.
    Concentration,
    /// Difficulty exiting positions.
    Liquidity,
    /// Leverage.
    Credit,
    /// Management complexity.
    Operational,
}

impl RiskFactorType {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Concentration => "concentration",
            Self::Liquidity => "liquidity",
            Self::Credit => "credit",
            Self::Operational => "operational",
        }
    }
}

/// A qualitative risk identified from portfolio structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Display name.
    pub name: String,
    /// Axis.
    pub factor_type: RiskFactorType,
    /// Severity.
    pub impact: Impact,
    /// Likelihood in [0, 1].
    pub probability: f64,
    /// What was observed.
    pub description: String,
    /// Suggested mitigations.
    pub mitigation: Vec<String>,
}
