//! Economic indicators and the seasonal adjustment hook.

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::{ForecastError, Result};

/// Default annual inflation rate in percent.
pub const DEFAULT_INFLATION_RATE: Decimal = dec!(2.5);

/// Default industry growth rate in percent.
pub const DEFAULT_INDUSTRY_GROWTH: Decimal = dec!(1.8);

/// Seasonal factor for October through December.
pub const Q4_SEASONAL_FACTOR: Decimal = dec!(1.15);

/// Seasonal factor for January through March.
pub const Q1_SEASONAL_FACTOR: Decimal = dec!(0.95);

/// Named economic factors that may adjust a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomicIndicators {
    /// Annual inflation rate in percent.
    pub inflation_rate: Decimal,
    /// Industry growth rate in percent.
    pub industry_growth: Decimal,
    /// Consumer confidence index. Not used by any forecast.
    pub consumer_confidence: Decimal,
    /// Calendar-driven multiplier.
    pub seasonal_factor: Decimal,
}

impl Default for EconomicIndicators {
    fn default() -> Self {
        Self {
            inflation_rate: DEFAULT_INFLATION_RATE,
            industry_growth: DEFAULT_INDUSTRY_GROWTH,
            consumer_confidence: Decimal::ZERO,
            seasonal_factor: Decimal::ONE,
        }
    }
}

impl EconomicIndicators {
    /// Default indicators with the seasonal factor for today's local date.
    #[must_use]
    pub fn current() -> Self {
        Self::default().with_seasonal_factor_for(Local::now().date_naive())
    }

    /// Returns a copy with the seasonal factor set for `date`'s month.
    #[must_use]
    pub fn with_seasonal_factor_for(self, date: NaiveDate) -> Self {
        self.apply_quarter(date.month())
    }

    /// Returns a copy with the seasonal factor set for `month` (1-12).
    ///
    /// Q4 raises the factor to 1.15 and Q1 lowers it to 0.95. Any other month
    /// keeps the existing factor.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::InvalidMonth` if `month` is not in 1..=12.
    pub fn with_seasonal_factor_for_month(self, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidMonth(month));
        }
        Ok(self.apply_quarter(month))
    }

    fn apply_quarter(self, month: u32) -> Self {
        match seasonal_factor_for_month(month) {
            Some(seasonal_factor) => Self {
                seasonal_factor,
                ..self
            },
            None => self,
        }
    }
}

/// Seasonal factor for a calendar month, if that month has one.
#[must_use]
pub fn seasonal_factor_for_month(month: u32) -> Option<Decimal> {
    match month {
        10..=12 => Some(Q4_SEASONAL_FACTOR),
        1..=3 => Some(Q1_SEASONAL_FACTOR),
        _ => None,
    }
}
