//! Asset-class allocation weights.

use serde::{Deserialize, Serialize};

/// The six asset classes an allocation is expressed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// Residential real estate.
    Residential,
    /// Commercial real estate.
    Commercial,
    /// Industrial real estate.
    Industrial,
    /// Undeveloped land.
    Land,
    /// Real-estate investment trusts.
    Reits,
    /// Anything else.
    Other,
}

impl AssetClass {
    /// All classes in reporting order.
    pub const ALL: [Self; 6] = [
        Self::Residential,
        Self::Commercial,
        Self::Industrial,
        Self::Land,
        Self::Reits,
        Self::Other,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
            Self::Land => "land",
            Self::Reits => "reits",
            Self::Other => "other",
        }
    }
}

/// Fractional weights per asset class. Weights are expected to sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetAllocation {
    /// Residential weight.
    pub residential: f64,
    /// Commercial weight.
    pub commercial: f64,
    /// Industrial weight.
    pub industrial: f64,
    /// Land weight.
    pub land: f64,
    /// REIT weight.
    pub reits: f64,
    /// Other weight.
    pub other: f64,
}

impl AssetAllocation {
    /// Allocation with the full weight in one class.
    #[must_use]
    pub fn single(class: AssetClass) -> Self {
        let mut allocation = Self::default();
        allocation.set(class, 1.0);
        allocation
    }

    /// Weight for a class.
    #[must_use]
    pub const fn weight(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Residential => self.residential,
            AssetClass::Commercial => self.commercial,
            AssetClass::Industrial => self.industrial,
            AssetClass::Land => self.land,
            AssetClass::Reits => self.reits,
            AssetClass::Other => self.other,
        }
    }

    /// Set the weight for a class.
    pub const fn set(&mut self, class: AssetClass, weight: f64) {
        match class {
            AssetClass::Residential => self.residential = weight,
            AssetClass::Commercial => self.commercial = weight,
            AssetClass::Industrial => self.industrial = weight,
            AssetClass::Land => self.land = weight,
            AssetClass::Reits => self.reits = weight,
            AssetClass::Other => self.other = weight,
        }
    }

    /// Weights in [`AssetClass::ALL`] order.
    #[must_use]
    pub fn weights(&self) -> [f64; 6] {
        AssetClass::ALL.map(|class| self.weight(class))
    }

    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.weights().iter().sum()
    }

    /// Classes whose weight differs from `target` by more than `threshold`,
    /// with the signed drift (`current - target`).
    #[must_use]
    pub fn drift_from(&self, target: &Self, threshold: f64) -> Vec<(AssetClass, f64)> {
        AssetClass::ALL
            .into_iter()
            .map(|class| (class, self.weight(class) - target.weight(class)))
            .filter(|(_, drift)| drift.abs() > threshold)
            .collect()
    }
}
