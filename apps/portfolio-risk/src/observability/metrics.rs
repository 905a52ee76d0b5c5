//! Metrics for portfolio risk analyses.
//!
//! # Example
//!
//! ```ignore
//! use portfolio_risk::observability::{analysis_status, record_analysis};
//!
//! record_analysis(analysis_status::SUCCESS, 0.004, Some(0.42));
//! ```

use metrics::{counter, gauge, histogram};

use crate::domain::{Impact, RecommendationType, RiskFactorType};

/// Status label values for `portfolio_risk_analyses_total`.
pub mod analysis_status {
    /// Analysis completed.
    pub const SUCCESS: &str = "success";
    /// Portfolio failed validation.
    pub const INVALID_PORTFOLIO: &str = "invalid_portfolio";
    /// Return series could not support a statistic.
    pub const INSUFFICIENT_DATA: &str = "insufficient_data";
}

// ============================================================================
// Analysis Metrics
// ============================================================================

/// Record a finished analysis.
///
/// # Arguments
///
/// * `status` - One of the [`analysis_status`] values
/// * `duration_seconds` - Wall time of the analysis
/// * `overall_risk` - Overall score, when the analysis succeeded
pub fn record_analysis(status: &str, duration_seconds: f64, overall_risk: Option<f64>) {
    counter!("portfolio_risk_analyses_total", "status" => status.to_string()).increment(1);
    histogram!("portfolio_risk_analysis_seconds").record(duration_seconds);

    if let Some(score) = overall_risk {
        gauge!("portfolio_risk_overall_score").set(score);
    }
}

/// Record a rejected portfolio.
///
/// # Arguments
///
/// * `field` - Offending field (e.g., `"properties"`, `"total_value"`)
pub fn record_rejection(field: &str) {
    counter!(
        "portfolio_risk_rejections_total",
        "field" => field.to_string()
    )
    .increment(1);
}

/// Record an identified risk factor.
pub fn record_factor(factor_type: RiskFactorType, impact: Impact) {
    counter!(
        "portfolio_risk_factors_total",
        "factor_type" => factor_type.as_str(),
        "impact" => impact.as_str()
    )
    .increment(1);
}

/// Record an emitted recommendation.
pub fn record_recommendation(recommendation_type: RecommendationType) {
    counter!(
        "portfolio_risk_recommendations_total",
        "recommendation_type" => recommendation_type.as_str()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_analysis() {
        // Without an installed recorder these are no-ops; they must not panic.
        record_analysis(analysis_status::SUCCESS, 0.002, Some(0.35));
        record_analysis(analysis_status::INSUFFICIENT_DATA, 0.001, None);
    }

    #[test]
    fn test_record_rejection() {
        record_rejection("properties");
    }

    #[test]
    fn test_record_factor() {
        record_factor(RiskFactorType::Credit, Impact::Critical);
    }

    #[test]
    fn test_record_recommendation() {
        record_recommendation(RecommendationType::Hedging);
    }
}
