//! Strongly-typed portfolio identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned to a portfolio by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortfolioId(String);

impl PortfolioId {
    /// Create a new identifier from a string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate a new unique identifier using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortfolioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PortfolioId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for PortfolioId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PortfolioId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
