//! Risk analytics: return series, statistics, factor scoring,
//! recommendations and the analyzer that sequences them.

pub mod analyzer;
pub mod factors;
pub mod math;
pub mod metrics;
pub mod recommendations;
pub mod returns;

pub use analyzer::{PortfolioRiskAnalyzer, analyze_portfolio_risk};
pub use factors::{FactorAssessment, FactorScores, RiskFactorIdentifier, ThresholdLadder};
pub use self::metrics::RiskMetricsCalculator;
pub use recommendations::{RecommendationContext, RecommendationEngine, RecommendationRule};
pub use returns::{
    BenchmarkReturnProvider, FixedBenchmark, MAX_NOISE_AMPLITUDE, MAX_TRAILING_MONTHS, ReturnSeries,
    ReturnSeriesBuilder, SyntheticBenchmark,
};
