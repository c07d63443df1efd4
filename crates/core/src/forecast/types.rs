//! Forecast data types.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::ForecastError;

/// Monthly expenses for one category, oldest first.
pub type ExpenseSeries = Vec<Decimal>;

/// Historical expenses keyed by category name.
pub type ExpenseData = BTreeMap<String, ExpenseSeries>;

/// Predicted next-month value keyed by category name.
pub type ForecastResult<V> = BTreeMap<String, V>;

/// Number of trailing months a moving average looks at.
pub const WINDOW_MONTHS: usize = 3;

/// Weights for the trailing window, oldest to newest.
pub const RECENCY_WEIGHTS: [Decimal; WINDOW_MONTHS] = [dec!(0.2), dec!(0.3), dec!(0.5)];

/// Forecasting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Unweighted mean of the last three months.
    Simple,
    /// Recency-weighted mean of the last three months, rounded.
    Weighted,
    /// Weighted forecast scaled by the inflation rate, rounded.
    InflationAdjusted,
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Weighted => write!(f, "weighted"),
            Self::InflationAdjusted => write!(f, "inflation_adjusted"),
        }
    }
}

impl FromStr for ForecastMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "weighted" => Ok(Self::Weighted),
            "inflation_adjusted" | "inflation-adjusted" => Ok(Self::InflationAdjusted),
            _ => Err(ForecastError::UnknownMethod(s.to_string())),
        }
    }
}

/// Output of a forecast run, tagged by the method that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Forecast {
    /// Unrounded simple moving averages.
    Simple {
        /// Predictions per category.
        predictions: ForecastResult<Decimal>,
    },
    /// Rounded weighted moving averages.
    Weighted {
        /// Predictions per category.
        predictions: ForecastResult<i64>,
    },
    /// Rounded inflation-adjusted weighted averages.
    InflationAdjusted {
        /// Rate (percent) that was applied.
        inflation_rate: Decimal,
        /// Predictions per category.
        predictions: ForecastResult<i64>,
    },
}

impl Forecast {
    /// Returns the method that produced this forecast.
    #[must_use]
    pub const fn method(&self) -> ForecastMethod {
        match self {
            Self::Simple { .. } => ForecastMethod::Simple,
            Self::Weighted { .. } => ForecastMethod::Weighted,
            Self::InflationAdjusted { .. } => ForecastMethod::InflationAdjusted,
        }
    }

    /// Returns the forecast categories in order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        match self {
            Self::Simple { predictions } => predictions.keys().map(String::as_str).collect(),
            Self::Weighted { predictions } | Self::InflationAdjusted { predictions, .. } => {
                predictions.keys().map(String::as_str).collect()
            }
        }
    }

    /// Returns the prediction for a category as a decimal.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<Decimal> {
        match self {
            Self::Simple { predictions } => predictions.get(category).copied(),
            Self::Weighted { predictions } | Self::InflationAdjusted { predictions, .. } => {
                predictions.get(category).map(|&v| Decimal::from(v))
            }
        }
    }
}

/// The four-category dataset used as the built-in sample.
#[must_use]
pub fn sample_expense_data() -> ExpenseData {
    let series = |values: [i64; 5]| -> ExpenseSeries {
        values.into_iter().map(Decimal::from).collect()
    };

    ExpenseData::from([
        ("Office Supplies".to_string(), series([120, 110, 150, 130, 140])),
        ("Marketing".to_string(), series([200, 240, 220, 210, 230])),
        ("Utilities".to_string(), series([90, 95, 100, 85, 90])),
        ("Rent".to_string(), series([1000, 1000, 1000, 1000, 1000])),
    ])
}
