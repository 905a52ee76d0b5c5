//! Domain layer: the portfolio snapshot supplied by callers and the risk
//! analysis report returned to them.
//!
//! Neither side has behavior beyond validation and small derived accessors;
//! all computation lives in [`crate::analytics`].

pub mod portfolio;
pub mod risk_analysis;

pub use portfolio::{
    AssetAllocation, AssetClass, LiquidityTier, Portfolio, PortfolioId, PortfolioProperty,
    PropertyMetadata, PropertyType,
};
pub use risk_analysis::{
    Impact, Priority, RecommendationType, RiskAnalysis, RiskFactor, RiskFactorType, RiskLevel,
    RiskMetrics, RiskRecommendation,
};
