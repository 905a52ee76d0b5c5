// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Portfolio Risk Engine - Rust Core Library
//!
//! Deterministic risk analysis for real-estate investment portfolios. A
//! [`Portfolio`] snapshot goes in, a [`RiskAnalysis`] comes out.
//!
//! # Layers
//!
//! - **Domain**: the portfolio snapshot and the analysis report
//!   - `portfolio`: holdings, metadata, asset allocation, validation
//!   - `risk_analysis`: metrics, factors, recommendations, risk levels
//!
//! - **Analytics**: the computation pipeline
//!   - `returns`: trailing portfolio and benchmark return series
//!   - `metrics`: volatility, beta, VaR, drawdown, risk-adjusted ratios
//!   - `factors`: market, concentration, liquidity, credit and operational scoring
//!   - `recommendations`: ordered mitigation rules
//!   - `analyzer`: orchestration and score aggregation
//!
//! - **Ambient**: `config` (YAML with env interpolation), `telemetry`
//!   (tracing subscriber), `observability` (metrics facade)
//!
//! # Example
//!
//! ```rust,ignore
//! use portfolio_risk::analyze_portfolio_risk;
//!
//! let analysis = analyze_portfolio_risk(&portfolio)?;
//! println!("{} ({})", analysis.overall_risk, analysis.risk_level());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - portfolio snapshot and analysis report.
pub mod domain;

/// Analytics layer - return series, statistics and scoring.
pub mod analytics;

/// Configuration loading and validation.
pub mod config;

/// Error types.
pub mod error;

/// Metrics facade helpers.
pub mod observability;

/// Logging initialization.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use analytics::{
    BenchmarkReturnProvider, FixedBenchmark, PortfolioRiskAnalyzer, RecommendationEngine,
    RecommendationRule, SyntheticBenchmark, analyze_portfolio_risk,
};
pub use config::{AnalysisConfig, Config, ConfigError, load_config};
pub use domain::{
    AssetAllocation, AssetClass, Impact, LiquidityTier, Portfolio, PortfolioId, PortfolioProperty,
    Priority, PropertyMetadata, PropertyType, RecommendationType, RiskAnalysis, RiskFactor,
    RiskFactorType, RiskLevel, RiskMetrics, RiskRecommendation,
};
pub use error::{ErrorCode, Result, RiskAnalysisError};
