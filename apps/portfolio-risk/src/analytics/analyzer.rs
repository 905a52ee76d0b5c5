//! Portfolio risk analyzer.
//!
//! Sequences the pipeline for one portfolio:
//!
//! 1. Validate the snapshot
//! 2. Build the trailing return series
//! 3. Compute metrics and identify factors (concurrently when `parallel`)
//! 4. Generate recommendations
//! 5. Aggregate the category scores and the overall score

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{Level, debug, info, span, warn};

use super::factors::{FactorAssessment, RiskFactorIdentifier};
use super::math::variance;
use super::metrics::RiskMetricsCalculator;
use super::recommendations::RecommendationEngine;
use super::returns::{BenchmarkReturnProvider, ReturnSeries, ReturnSeriesBuilder, SyntheticBenchmark};
use crate::config::AnalysisConfig;
use crate::domain::{Portfolio, RiskAnalysis, RiskMetrics, RiskRecommendation};
use crate::error::{ErrorCode, Result, RiskAnalysisError};
use crate::observability::{
    analysis_status, record_analysis, record_factor, record_recommendation, record_rejection,
};

/// Weights of the overall risk score.
mod weights {
    pub const VOLATILITY: f64 = 0.3;
    pub const BETA: f64 = 0.2;
    pub const CONCENTRATION: f64 = 0.2;
    pub const VAR_AMOUNT: f64 = 0.15;
    pub const HIGH_SEVERITY_FACTOR: f64 = 0.15;
    /// Monetary VaR is expressed in millions before weighting.
    pub const VAR_SCALE: f64 = 1_000_000.0;
}

/// Beta of the market itself.
const MARKET_BETA: f64 = 1.0;

/// Analyzes portfolios against a benchmark.
///
/// Holds no per-call state; one analyzer can be shared across threads.
#[derive(Debug, Clone)]
pub struct PortfolioRiskAnalyzer {
    config: AnalysisConfig,
    benchmark: Arc<dyn BenchmarkReturnProvider>,
    recommendations: Arc<RecommendationEngine>,
}

impl Default for PortfolioRiskAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl PortfolioRiskAnalyzer {
    /// Create an analyzer with the synthetic benchmark described by `config`.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        let benchmark = SyntheticBenchmark::new(
            config.market_return_annual,
            config.benchmark.noise_amplitude,
            config.benchmark.seed,
        );
        Self {
            config,
            benchmark: Arc::new(benchmark),
            recommendations: Arc::new(RecommendationEngine::default()),
        }
    }

    /// Replace the benchmark source.
    #[must_use]
    pub fn with_benchmark(mut self, benchmark: Arc<dyn BenchmarkReturnProvider>) -> Self {
        self.benchmark = benchmark;
        self
    }

    /// Replace the recommendation rules.
    #[must_use]
    pub fn with_recommendation_engine(mut self, engine: RecommendationEngine) -> Self {
        self.recommendations = Arc::new(engine);
        self
    }

    /// Analysis parameters in use.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one portfolio.
    ///
    /// # Errors
    ///
    /// `InvalidPortfolio` when the snapshot fails validation;
    /// `InsufficientData` when the return series cannot support a statistic.
    pub fn analyze(&self, portfolio: &Portfolio) -> Result<RiskAnalysis> {
        let _span = span!(Level::DEBUG, "portfolio_risk.analyze", portfolio_id = %portfolio.id)
            .entered();
        let start = Instant::now();

        let result = self.run(portfolio);
        let elapsed = start.elapsed().as_secs_f64();

        match &result {
            Ok(analysis) => {
                record_analysis(analysis_status::SUCCESS, elapsed, Some(analysis.overall_risk));
                for factor in &analysis.risk_factors {
                    record_factor(factor.factor_type, factor.impact);
                }
                for rec in &analysis.recommendations {
                    record_recommendation(rec.recommendation_type);
                }
                info!(
                    portfolio_id = %portfolio.id,
                    overall_risk = analysis.overall_risk,
                    risk_level = %analysis.risk_level(),
                    factors = analysis.risk_factors.len(),
                    recommendations = analysis.recommendations.len(),
                    elapsed_ms = elapsed * 1000.0,
                    "Portfolio risk analysis complete"
                );
            }
            Err(err) => {
                let status = match err.code() {
                    ErrorCode::InvalidPortfolio => analysis_status::INVALID_PORTFOLIO,
                    ErrorCode::InsufficientData => analysis_status::INSUFFICIENT_DATA,
                };
                record_analysis(status, elapsed, None);
                warn!(
                    portfolio_id = %portfolio.id,
                    code = %err.code(),
                    error = %err,
                    "Portfolio risk analysis failed"
                );
            }
        }

        result
    }

    /// Analyze independent portfolios in parallel, one result per input in
    /// input order.
    pub fn analyze_batch(&self, portfolios: &[Portfolio]) -> Vec<Result<RiskAnalysis>> {
        info!(portfolios = portfolios.len(), "Starting batch risk analysis");
        portfolios.par_iter().map(|p| self.analyze(p)).collect()
    }

    fn run(&self, portfolio: &Portfolio) -> Result<RiskAnalysis> {
        if let Err(err) = portfolio.validate(self.config.allocation_tolerance) {
            if let RiskAnalysisError::InvalidPortfolio { field, .. } = &err {
                record_rejection(field);
            }
            return Err(err);
        }

        let series = ReturnSeriesBuilder::new(self.config.trailing_months)
            .build(portfolio, self.benchmark.as_ref())?;

        let calculator = RiskMetricsCalculator::from_config(&self.config);
        let (metrics, assessment) = if self.config.parallel {
            rayon::join(
                || calculator.calculate(&series, portfolio),
                || RiskFactorIdentifier::identify(portfolio, &series),
            )
        } else {
            (
                calculator.calculate(&series, portfolio),
                RiskFactorIdentifier::identify(portfolio, &series),
            )
        };
        let metrics = metrics?;
        let assessment = assessment?;

        let recommendations = self.recommendations.generate(&metrics, portfolio);

        Ok(assemble(portfolio, &series, metrics, assessment, recommendations))
    }
}

fn assemble(
    portfolio: &Portfolio,
    series: &ReturnSeries,
    metrics: RiskMetrics,
    assessment: FactorAssessment,
    recommendations: Vec<RiskRecommendation>,
) -> RiskAnalysis {
    let FactorAssessment { scores, factors } = assessment;
    let high_severity = factors
        .iter()
        .filter(|f| f.impact.is_high_or_critical())
        .count();

    let overall_risk = overall_risk_score(&metrics, high_severity);
    let unsystematic_risk = unsystematic_variance(series, metrics.beta);

    debug!(
        portfolio_id = %portfolio.id,
        overall_risk,
        unsystematic_risk,
        high_severity,
        "Aggregated risk scores"
    );

    RiskAnalysis {
        portfolio_id: portfolio.id.clone(),
        overall_risk,
        systematic_risk: metrics.beta * MARKET_BETA,
        unsystematic_risk,
        concentration_risk: metrics.concentration_index,
        liquidity_risk: scores.liquidity,
        market_risk: metrics.beta,
        credit_risk: scores.credit,
        operational_risk: scores.operational,
        risk_factors: factors,
        risk_metrics: metrics,
        recommendations,
    }
}

/// Weighted blend of volatility, beta, concentration, monetary VaR and the
/// number of high-severity factors, clamped to [0, 1].
#[must_use]
pub fn overall_risk_score(metrics: &RiskMetrics, high_severity_factors: usize) -> f64 {
    let score = metrics.volatility * weights::VOLATILITY
        + metrics.beta * weights::BETA
        + metrics.concentration_index * weights::CONCENTRATION
        + metrics.value_at_risk_amount / weights::VAR_SCALE * weights::VAR_AMOUNT
        + high_severity_factors as f64 * weights::HIGH_SEVERITY_FACTOR;

    if score.is_finite() { score.clamp(0.0, 1.0) } else { 1.0 }
}

/// var(portfolio) - beta² × var(benchmark), floored at zero.
#[must_use]
pub fn unsystematic_variance(series: &ReturnSeries, beta: f64) -> f64 {
    let portfolio_var = variance(&series.portfolio).unwrap_or(0.0);
    let benchmark_var = variance(&series.benchmark).unwrap_or(0.0);
    beta.mul_add(-beta * benchmark_var, portfolio_var).max(0.0)
}

/// Analyze a portfolio with default parameters.
///
/// # Errors
///
/// See [`PortfolioRiskAnalyzer::analyze`].
pub fn analyze_portfolio_risk(portfolio: &Portfolio) -> Result<RiskAnalysis> {
    PortfolioRiskAnalyzer::default().analyze(portfolio)
}
