//! Error handling for the portfolio risk engine.
//!
//! Every failure is a local validation failure: the engine has no external
//! dependency, so nothing here is retryable. Callers should surface the
//! error as "cannot assess risk for this portfolio as given" rather than
//! defaulting scores to zero.
//!
//! | Code | Raised when |
//! |------|-------------|
//! | `INVALID_PORTFOLIO` | Empty holdings, non-positive total value, allocation weights off 1.0 |
//! | `INSUFFICIENT_DATA` | Return series under two points, zero benchmark variance, undefined ratios in strict mode |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for the risk engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The supplied portfolio violates an input invariant.
    InvalidPortfolio,
    /// The return series cannot support the requested statistic.
    InsufficientData,
}

impl ErrorCode {
    /// Stable reason string for logs and error payloads.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidPortfolio => "INVALID_PORTFOLIO",
            Self::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors raised while analyzing a portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskAnalysisError {
    /// The portfolio failed input validation.
    #[error("[INVALID_PORTFOLIO] {field}: {message}")]
    InvalidPortfolio {
        /// Offending field.
        field: String,
        /// Human-readable message.
        message: String,
    },

    /// Not enough data (or a degenerate series) to compute a statistic.
    #[error("[INSUFFICIENT_DATA] {metric}: {message}")]
    InsufficientData {
        /// Statistic being computed.
        metric: String,
        /// Human-readable message.
        message: String,
    },
}

impl RiskAnalysisError {
    /// Invalid portfolio input.
    #[must_use]
    pub fn invalid_portfolio(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPortfolio {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Insufficient data for a statistic.
    #[must_use]
    pub fn insufficient_data(metric: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InsufficientData {
            metric: metric.into(),
            message: message.into(),
        }
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidPortfolio { .. } => ErrorCode::InvalidPortfolio,
            Self::InsufficientData { .. } => ErrorCode::InsufficientData,
        }
    }

    /// Convert to a serializable error payload.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        let (subject, message) = match self {
            Self::InvalidPortfolio { field, message } => (field, message),
            Self::InsufficientData { metric, message } => (metric, message),
        };
        ErrorResponse {
            code: self.code().reason().to_string(),
            subject: subject.clone(),
            message: message.clone(),
        }
    }
}

/// Serializable error body, printed by the CLI on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code string.
    pub code: String,
    /// Field or metric the error refers to.
    pub subject: String,
    /// Human-readable message.
    pub message: String,
}

/// Result alias for risk analysis operations.
pub type Result<T> = std::result::Result<T, RiskAnalysisError>;
