//! Individual property holdings.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Property type of a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    /// Single or multi-family residential.
    Residential,
    /// Office, retail and other commercial property.
    Commercial,
    /// Warehouses, logistics and manufacturing.
    Industrial,
    /// Undeveloped land.
    Land,
    /// Mixed residential/commercial use.
    MixedUse,
    /// Anything else.
    Other,
}

/// How quickly a holding can be sold near its current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityTier {
    /// Readily marketable.
    High,
    /// Marketable with some delay or discount.
    #[default]
    Medium,
    /// Hard to sell.
    Low,
}

/// Descriptive metadata for a holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyMetadata {
    /// Property type.
    pub property_type: PropertyType,
    /// Number of rentable units.
    #[serde(default)]
    pub units: Option<u32>,
    /// Building age in years.
    #[serde(default)]
    pub age: Option<u32>,
    /// Outstanding loan balance.
    #[serde(default)]
    pub loan_amount: Option<Decimal>,
    /// Liquidity classification.
    #[serde(default)]
    pub liquidity_tier: LiquidityTier,
}

impl PropertyMetadata {
    /// Metadata with only a property type; everything else unset.
    #[must_use]
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            units: None,
            age: None,
            loan_amount: None,
            liquidity_tier: LiquidityTier::default(),
        }
    }

    /// Set the unit count.
    #[must_use]
    pub const fn with_units(mut self, units: u32) -> Self {
        self.units = Some(units);
        self
    }

    /// Set the building age.
    #[must_use]
    pub const fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Set the loan balance.
    #[must_use]
    pub const fn with_loan(mut self, loan_amount: Decimal) -> Self {
        self.loan_amount = Some(loan_amount);
        self
    }

    /// Set the liquidity tier.
    #[must_use]
    pub const fn with_liquidity(mut self, tier: LiquidityTier) -> Self {
        self.liquidity_tier = tier;
        self
    }
}

/// A single property position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioProperty {
    /// Current market value.
    pub current_value: Decimal,
    /// Gross monthly rent, if let.
    #[serde(default)]
    pub monthly_rent: Option<Decimal>,
    /// Annualized total return in percent (e.g., 8.0 for 8%).
    pub total_return_percentage: f64,
    /// Descriptive metadata.
    pub property_metadata: PropertyMetadata,
}

impl PortfolioProperty {
    /// Create a holding without rent.
    #[must_use]
    pub const fn new(
        current_value: Decimal,
        total_return_percentage: f64,
        property_metadata: PropertyMetadata,
    ) -> Self {
        Self {
            current_value,
            monthly_rent: None,
            total_return_percentage,
            property_metadata,
        }
    }

    /// Set the monthly rent.
    #[must_use]
    pub const fn with_monthly_rent(mut self, rent: Decimal) -> Self {
        self.monthly_rent = Some(rent);
        self
    }

    /// Current value as `f64`.
    #[must_use]
    pub fn current_value_f64(&self) -> f64 {
        self.current_value.to_f64().unwrap_or(0.0)
    }

    /// Loan-to-value ratio; 0 when there is no loan or no value.
    #[must_use]
    pub fn loan_to_value(&self) -> f64 {
        let value = self.current_value_f64();
        match self.property_metadata.loan_amount {
            Some(loan) if value > 0.0 => loan.to_f64().unwrap_or(0.0) / value,
            _ => 0.0,
        }
    }

    /// Whether the holding is tagged as highly liquid.
    #[must_use]
    pub fn is_highly_liquid(&self) -> bool {
        self.property_metadata.liquidity_tier == LiquidityTier::High
    }
}
