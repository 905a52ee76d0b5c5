//! Rule-based mitigation recommendations.
//!
//! Each rule is an independent [`RecommendationRule`]; the engine evaluates
//! them in order and keeps every recommendation that fires. Callers can
//! append their own rules with [`RecommendationEngine::with_rule`].

use std::fmt::Debug;

use crate::domain::{Portfolio, Priority, RecommendationType, RiskMetrics, RiskRecommendation};

/// Concentration index above which diversification is recommended.
pub const CONCENTRATION_THRESHOLD: f64 = 0.7;
/// Beta above which market risk reduction is recommended.
pub const BETA_THRESHOLD: f64 = 1.2;
/// Per-class allocation drift above which rebalancing is recommended.
pub const DRIFT_THRESHOLD: f64 = 0.05;
/// VaR loss, as a share of total value, above which hedging is recommended.
pub const VAR_SHARE_THRESHOLD: f64 = 0.10;

/// Inputs a rule may inspect.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationContext<'a> {
    /// Computed statistics.
    pub metrics: &'a RiskMetrics,
    /// The analyzed portfolio.
    pub portfolio: &'a Portfolio,
}

/// A predicate that may produce one recommendation.
pub trait RecommendationRule: Send + Sync + Debug {
    /// Return a recommendation when the rule fires.
    fn evaluate(&self, ctx: &RecommendationContext<'_>) -> Option<RiskRecommendation>;
}

fn steps(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Concentration index above [`CONCENTRATION_THRESHOLD`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DiversificationRule;

impl RecommendationRule for DiversificationRule {
    fn evaluate(&self, ctx: &RecommendationContext<'_>) -> Option<RiskRecommendation> {
        let index = ctx.metrics.concentration_index;
        (index > CONCENTRATION_THRESHOLD).then(|| RiskRecommendation {
            recommendation_type: RecommendationType::Diversification,
            priority: Priority::High,
            description: format!(
                "Portfolio value is highly concentrated (concentration index {index:.2})"
            ),
            action: "Diversify across additional properties, markets and asset classes"
                .to_string(),
            expected_impact: 0.3,
            implementation: steps(&[
                "Identify the holdings that dominate portfolio value",
                "Set a maximum weight for any single property",
                "Acquire properties in under-represented markets or classes",
                "Consider REITs for immediate diversified exposure",
            ]),
        })
    }
}

/// Beta above [`BETA_THRESHOLD`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketSensitivityRule;

impl RecommendationRule for MarketSensitivityRule {
    fn evaluate(&self, ctx: &RecommendationContext<'_>) -> Option<RiskRecommendation> {
        let beta = ctx.metrics.beta;
        (beta > BETA_THRESHOLD).then(|| RiskRecommendation {
            recommendation_type: RecommendationType::RiskManagement,
            priority: Priority::Medium,
            description: format!("Portfolio beta of {beta:.2} exceeds the market"),
            action: "Reduce sensitivity to broad market movements".to_string(),
            expected_impact: 0.2,
            implementation: steps(&[
                "Shift weight toward defensive property types",
                "Reduce leverage on the most cyclical holdings",
                "Add holdings with low correlation to the market",
            ]),
        })
    }
}

/// Any allocation class more than [`DRIFT_THRESHOLD`] away from target.
///
/// Never fires without a target allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RebalancingRule;

impl RecommendationRule for RebalancingRule {
    fn evaluate(&self, ctx: &RecommendationContext<'_>) -> Option<RiskRecommendation> {
        let target = ctx.portfolio.target_allocation.as_ref()?;
        let drifted = ctx
            .portfolio
            .current_allocation
            .drift_from(target, DRIFT_THRESHOLD);
        if drifted.is_empty() {
            return None;
        }

        let classes = drifted
            .iter()
            .map(|(class, drift)| format!("{} {:+.1}%", class.as_str(), drift * 100.0))
            .collect::<Vec<_>>()
            .join(", ");

        Some(RiskRecommendation {
            recommendation_type: RecommendationType::Rebalancing,
            priority: Priority::Medium,
            description: format!("Allocation has drifted from target: {classes}"),
            action: "Rebalance holdings toward the target allocation".to_string(),
            expected_impact: 0.15,
            implementation: steps(&[
                "Review the drift of each asset class against target",
                "Direct new capital to underweight classes",
                "Schedule sales of overweight holdings where costs allow",
                "Set a periodic rebalancing review",
            ]),
        })
    }
}

/// VaR loss above [`VAR_SHARE_THRESHOLD`] of total value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TailRiskRule;

impl RecommendationRule for TailRiskRule {
    fn evaluate(&self, ctx: &RecommendationContext<'_>) -> Option<RiskRecommendation> {
        let loss = ctx.metrics.value_at_risk_amount;
        let limit = ctx.portfolio.total_value_f64() * VAR_SHARE_THRESHOLD;
        (loss > limit).then(|| RiskRecommendation {
            recommendation_type: RecommendationType::Hedging,
            priority: Priority::High,
            description: format!(
                "Value at risk of {loss:.0} exceeds {:.0}% of portfolio value",
                VAR_SHARE_THRESHOLD * 100.0
            ),
            action: "Hedge downside exposure".to_string(),
            expected_impact: 0.25,
            implementation: steps(&[
                "Quantify the exposure behind the tail losses",
                "Evaluate interest-rate and REIT index hedges",
                "Increase cash reserves to cover the VaR loss",
            ]),
        })
    }
}

/// Ordered set of recommendation rules.
#[derive(Debug)]
pub struct RecommendationEngine {
    rules: Vec<Box<dyn RecommendationRule>>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self {
            rules: vec![
                Box::new(DiversificationRule),
                Box::new(MarketSensitivityRule),
                Box::new(RebalancingRule),
                Box::new(TailRiskRule),
            ],
        }
    }
}

impl RecommendationEngine {
    /// An engine with no rules.
    #[must_use]
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule, evaluated after the existing ones.
    #[must_use]
    pub fn with_rule(mut self, rule: Box<dyn RecommendationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the engine has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule in order.
    #[must_use]
    pub fn generate(&self, metrics: &RiskMetrics, portfolio: &Portfolio) -> Vec<RiskRecommendation> {
        let ctx = RecommendationContext { metrics, portfolio };
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(&ctx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AssetAllocation, AssetClass, PortfolioProperty, PropertyMetadata, PropertyType,
    };
    use rust_decimal_macros::dec;

    fn metrics() -> RiskMetrics {
        RiskMetrics {
            volatility: 0.01,
            mean_return: 0.005,
            annualized_return: 0.06,
            beta: 0.9,
            correlation_with_market: Some(0.8),
            sharpe_ratio: Some(0.3),
            sortino_ratio: None,
            calmar_ratio: None,
            information_ratio: Some(0.1),
            tracking_error: 0.01,
            value_at_risk: -0.01,
            value_at_risk_amount: 10_000.0,
            expected_shortfall: -0.015,
            maximum_drawdown: 0.02,
            concentration_index: 0.5,
            herfindahl_index: 1.0,
        }
    }

    fn portfolio() -> Portfolio {
        let meta = PropertyMetadata::new(PropertyType::Residential);
        Portfolio::new(
            "pf-recs",
            dec!(1000000),
            vec![
                PortfolioProperty::new(dec!(500000), 6.0, meta.clone()),
                PortfolioProperty::new(dec!(500000), 4.0, meta),
            ],
            AssetAllocation::single(AssetClass::Residential),
        )
    }

    fn types(recs: &[RiskRecommendation]) -> Vec<RecommendationType> {
        recs.iter().map(|r| r.recommendation_type).collect()
    }

    #[test]
    fn test_quiet_portfolio_has_no_recommendations() {
        let recs = RecommendationEngine::default().generate(&metrics(), &portfolio());
        assert!(recs.is_empty());
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let mut m = metrics();
        m.concentration_index = 0.8;
        m.beta = 1.3;
        m.value_at_risk_amount = 150_000.0;

        let mut target = AssetAllocation::single(AssetClass::Residential);
        target.set(AssetClass::Residential, 0.8);
        target.set(AssetClass::Commercial, 0.2);
        let p = portfolio().with_target_allocation(target);

        let recs = RecommendationEngine::default().generate(&m, &p);

        assert_eq!(
            types(&recs),
            vec![
                RecommendationType::Diversification,
                RecommendationType::RiskManagement,
                RecommendationType::Rebalancing,
                RecommendationType::Hedging,
            ]
        );
        assert_eq!(recs[0].priority, Priority::High);
        assert_eq!(recs[1].priority, Priority::Medium);
        assert_eq!(recs[2].priority, Priority::Medium);
        assert_eq!(recs[3].priority, Priority::High);
        assert!(recs.iter().all(|r| (3..=4).contains(&r.implementation.len())));
        assert!(recs[2].description.contains("residential"));
    }

    #[test]
    fn test_thresholds_are_strict() {
        let mut m = metrics();
        m.concentration_index = CONCENTRATION_THRESHOLD;
        m.beta = BETA_THRESHOLD;
        m.value_at_risk_amount = 100_000.0;

        let recs = RecommendationEngine::default().generate(&m, &portfolio());
        assert!(recs.is_empty());
    }

    #[test]
    fn test_no_target_means_no_rebalancing() {
        let ctx_metrics = metrics();
        let p = portfolio();
        let ctx = RecommendationContext {
            metrics: &ctx_metrics,
            portfolio: &p,
        };
        assert!(RebalancingRule.evaluate(&ctx).is_none());
    }

    #[test]
    fn test_small_drift_does_not_rebalance() {
        let mut target = AssetAllocation::single(AssetClass::Residential);
        target.set(AssetClass::Residential, 0.96);
        target.set(AssetClass::Land, 0.04);
        let p = portfolio().with_target_allocation(target);

        let recs = RecommendationEngine::default().generate(&metrics(), &p);
        assert!(recs.is_empty());
    }

    #[derive(Debug)]
    struct AlwaysFires;

    impl RecommendationRule for AlwaysFires {
        fn evaluate(&self, _ctx: &RecommendationContext<'_>) -> Option<RiskRecommendation> {
            Some(RiskRecommendation {
                recommendation_type: RecommendationType::RiskManagement,
                priority: Priority::Low,
                description: "custom".to_string(),
                action: "custom".to_string(),
                expected_impact: 0.05,
                implementation: vec!["do it".to_string()],
            })
        }
    }

    #[test]
    fn test_custom_rule_is_appended() {
        let engine = RecommendationEngine::default().with_rule(Box::new(AlwaysFires));
        assert_eq!(engine.len(), 5);

        let recs = engine.generate(&metrics(), &portfolio());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].priority, Priority::Low);
    }

    #[test]
    fn test_empty_engine() {
        let engine = RecommendationEngine::empty();
        assert!(engine.is_empty());
        assert!(engine.generate(&metrics(), &portfolio()).is_empty());
    }
}
