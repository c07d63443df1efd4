//! Providers of economic indicator values.
//!
//! Forecast arithmetic only sees the `IndicatorSource` trait. The built-in
//! provider serves a constant; a live feed can be plugged in later by
//! implementing the trait or wrapping a function in `FnIndicatorSource`.

use rust_decimal::Decimal;

use super::error::Result;
use super::indicators::{DEFAULT_INFLATION_RATE, EconomicIndicators};

/// Something that can report the current inflation rate.
pub trait IndicatorSource: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Annual inflation rate in percent.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::IndicatorUnavailable` if the rate cannot be
    /// obtained.
    fn inflation_rate(&self) -> Result<Decimal>;
}

/// Serves a fixed inflation rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticIndicatorSource {
    inflation_rate: Decimal,
}

impl StaticIndicatorSource {
    /// Creates a source that always reports `inflation_rate`.
    #[must_use]
    pub const fn new(inflation_rate: Decimal) -> Self {
        Self { inflation_rate }
    }
}

impl Default for StaticIndicatorSource {
    fn default() -> Self {
        Self::new(DEFAULT_INFLATION_RATE)
    }
}

impl From<EconomicIndicators> for StaticIndicatorSource {
    fn from(indicators: EconomicIndicators) -> Self {
        Self::new(indicators.inflation_rate)
    }
}

impl IndicatorSource for StaticIndicatorSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn inflation_rate(&self) -> Result<Decimal> {
        Ok(self.inflation_rate)
    }
}

/// Adapts a closure into an `IndicatorSource`.
pub struct FnIndicatorSource<F> {
    name: &'static str,
    fetch: F,
}

impl<F> FnIndicatorSource<F>
where
    F: Fn() -> Result<Decimal> + Send + Sync,
{
    /// Wraps `fetch` under the given source name.
    #[must_use]
    pub const fn new(name: &'static str, fetch: F) -> Self {
        Self { name, fetch }
    }
}

impl<F> IndicatorSource for FnIndicatorSource<F>
where
    F: Fn() -> Result<Decimal> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn inflation_rate(&self) -> Result<Decimal> {
        (self.fetch)()
    }
}
