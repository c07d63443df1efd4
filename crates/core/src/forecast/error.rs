//! Forecast error types.

use rust_decimal::Decimal;
use spendcast_shared::AppError;
use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Forecast-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    /// A category has no historical values.
    #[error("Expense series for {category} is empty")]
    EmptySeries {
        /// Category name.
        category: String,
    },

    /// A category has fewer months than strict validation requires.
    #[error("Need at least {needed} months of data for {category}, got {got}")]
    InsufficientHistory {
        /// Category name.
        category: String,
        /// Required number of months.
        needed: usize,
        /// Available number of months.
        got: usize,
    },

    /// Inflation rate outside -100..=1000 percent.
    #[error("Inflation rate must be between -100 and 1000 percent, got {0}")]
    InvalidInflationRate(Decimal),

    /// Calendar month outside 1..=12.
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    /// Rounded forecast does not fit in an `i64`.
    #[error("Forecast for {category} is out of range")]
    ValueOutOfRange {
        /// Category name.
        category: String,
    },

    /// Forecast method name not recognized.
    #[error("Unknown forecast method: {0}")]
    UnknownMethod(String),

    /// Economic indicator source failed.
    #[error("Indicator source {source_name} unavailable: {reason}")]
    IndicatorUnavailable {
        /// Name of the failing source.
        source_name: &'static str,
        /// Failure description.
        reason: String,
    },
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::IndicatorUnavailable { .. } => Self::ExternalService(err.to_string()),
            ForecastError::UnknownMethod(_) => Self::Configuration(err.to_string()),
            ForecastError::EmptySeries { .. }
            | ForecastError::InsufficientHistory { .. }
            | ForecastError::InvalidInflationRate(_)
            | ForecastError::InvalidMonth(_) => Self::Validation(err.to_string()),
            ForecastError::ValueOutOfRange { .. } => Self::Internal(err.to_string()),
        }
    }
}
