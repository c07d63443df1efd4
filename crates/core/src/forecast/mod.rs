//! Next-month expense forecasts.

pub mod cache;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod source;
pub mod types;


pub use cache::CachedIndicatorSource;
pub use engine::ForecastEngine;
pub use error::{ForecastError, Result};
pub use indicators::{EconomicIndicators, seasonal_factor_for_month};
pub use source::{FnIndicatorSource, IndicatorSource, StaticIndicatorSource};
pub use types::{
    ExpenseData, ExpenseSeries, Forecast, ForecastMethod, ForecastResult, RECENCY_WEIGHTS,
    WINDOW_MONTHS, sample_expense_data,
};
