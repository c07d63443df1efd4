//! Forecast engine for next-month expense predictions.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use tracing::debug;

use super::error::{ForecastError, Result};
use super::source::IndicatorSource;
use super::types::{
    ExpenseData, Forecast, ForecastMethod, ForecastResult, RECENCY_WEIGHTS, WINDOW_MONTHS,
};

/// Divisor of the simple moving average, applied even to shorter windows.
const WINDOW_DIVISOR: Decimal = dec!(3);

/// Lowest accepted inflation rate in percent.
const MIN_INFLATION_RATE: Decimal = dec!(-100);

/// Highest accepted inflation rate in percent.
const MAX_INFLATION_RATE: Decimal = dec!(1000);

/// Engine for expense forecasts.
///
/// Every operation is a pure function of its input: the output has exactly
/// the input's categories, and each prediction depends only on that
/// category's own series.
pub struct ForecastEngine;

impl ForecastEngine {
    /// Simple moving average of the last three months.
    ///
    /// The sum of the trailing window is always divided by 3, so a category
    /// with fewer than three months is under-stated rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::EmptySeries` if any category has no values, or
    /// `ForecastError::ValueOutOfRange` if a window sum overflows.
    pub fn simple_moving_average(data: &ExpenseData) -> Result<ForecastResult<Decimal>> {
        data.iter()
            .map(|(category, series)| {
                let window = trailing_window(category, series)?;
                let sum = window
                    .iter()
                    .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
                    .ok_or_else(|| out_of_range(category))?;
                Ok((category.clone(), sum / WINDOW_DIVISOR))
            })
            .collect()
    }

    /// Weighted moving average of the last three months, rounded.
    ///
    /// Weights `0.2, 0.3, 0.5` go oldest to newest. For a window shorter than
    /// three months the weights are paired from the front, so two months get
    /// `0.2` and `0.3` only. Rounding is banker's rounding.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::EmptySeries` if any category has no values.
    pub fn weighted_moving_average(data: &ExpenseData) -> Result<ForecastResult<i64>> {
        data.iter()
            .map(|(category, series)| {
                let window = trailing_window(category, series)?;
                let weighted = Self::weighted_sum(window);
                Ok((category.clone(), round_to_whole(category, weighted)?))
            })
            .collect()
    }

    /// Unrounded weighted sum of a trailing window.
    #[must_use]
    pub fn weighted_sum(window: &[Decimal]) -> Decimal {
        RECENCY_WEIGHTS
            .iter()
            .zip(window)
            .map(|(weight, value)| weight * value)
            .sum()
    }

    /// Weighted forecast scaled by `1 + inflation_rate / 100`, rounded.
    ///
    /// The rate applies uniformly to every category.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::InvalidInflationRate` if the rate is outside
    /// -100..=1000, or `ForecastError::EmptySeries` for an empty category.
    pub fn inflation_adjusted(
        data: &ExpenseData,
        inflation_rate: Decimal,
    ) -> Result<ForecastResult<i64>> {
        Self::validate_inflation_rate(inflation_rate)?;

        let multiplier = Decimal::ONE + inflation_rate / Decimal::ONE_HUNDRED;
        Self::weighted_moving_average(data)?
            .into_iter()
            .map(|(category, weighted)| {
                let adjusted = round_to_whole(&category, Decimal::from(weighted) * multiplier)?;
                Ok((category, adjusted))
            })
            .collect()
    }

    /// Inflation-adjusted forecast using the rate reported by `source`.
    ///
    /// The source is queried once per call.
    ///
    /// # Errors
    ///
    /// Propagates source failures and the errors of `inflation_adjusted`.
    pub fn inflation_adjusted_from_source(
        data: &ExpenseData,
        source: &dyn IndicatorSource,
    ) -> Result<(Decimal, ForecastResult<i64>)> {
        let rate = source.inflation_rate()?;
        debug!(source = source.name(), %rate, "using inflation rate");
        let predictions = Self::inflation_adjusted(data, rate)?;
        Ok((rate, predictions))
    }

    /// Multiplies each integer forecast by a seasonal factor, rounded.
    ///
    /// Opt-in: no forecast method applies the seasonal factor on its own.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::ValueOutOfRange` if a scaled value overflows.
    pub fn apply_seasonal_factor(
        forecast: &ForecastResult<i64>,
        seasonal_factor: Decimal,
    ) -> Result<ForecastResult<i64>> {
        forecast
            .iter()
            .map(|(category, &value)| {
                let scaled = Decimal::from(value)
                    .checked_mul(seasonal_factor)
                    .ok_or_else(|| out_of_range(category))?;
                let scaled = round_to_whole(category, scaled)?;
                Ok((category.clone(), scaled))
            })
            .collect()
    }

    /// Applies a seasonal factor to a forecast of any method.
    ///
    /// Simple averages stay unrounded; integer forecasts are re-rounded.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::ValueOutOfRange` if a scaled value overflows.
    pub fn seasonally_adjust(forecast: Forecast, seasonal_factor: Decimal) -> Result<Forecast> {
        let adjusted = match forecast {
            Forecast::Simple { predictions } => Forecast::Simple {
                predictions: predictions
                    .into_iter()
                    .map(|(category, value)| match value.checked_mul(seasonal_factor) {
                        Some(scaled) => Ok((category, scaled)),
                        None => Err(out_of_range(&category)),
                    })
                    .collect::<Result<_>>()?,
            },
            Forecast::Weighted { predictions } => Forecast::Weighted {
                predictions: Self::apply_seasonal_factor(&predictions, seasonal_factor)?,
            },
            Forecast::InflationAdjusted {
                inflation_rate,
                predictions,
            } => Forecast::InflationAdjusted {
                inflation_rate,
                predictions: Self::apply_seasonal_factor(&predictions, seasonal_factor)?,
            },
        };
        Ok(adjusted)
    }

    /// Checks that every category has at least `min_months` of history.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::EmptySeries` for an empty category and
    /// `ForecastError::InsufficientHistory` for a short one.
    pub fn validate_history(data: &ExpenseData, min_months: usize) -> Result<()> {
        for (category, series) in data {
            if series.is_empty() {
                return Err(ForecastError::EmptySeries {
                    category: category.clone(),
                });
            }
            if series.len() < min_months {
                return Err(ForecastError::InsufficientHistory {
                    category: category.clone(),
                    needed: min_months,
                    got: series.len(),
                });
            }
        }
        Ok(())
    }

    /// Validates an inflation rate in percent.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::InvalidInflationRate` outside -100..=1000.
    pub fn validate_inflation_rate(inflation_rate: Decimal) -> Result<()> {
        if !(MIN_INFLATION_RATE..=MAX_INFLATION_RATE).contains(&inflation_rate) {
            return Err(ForecastError::InvalidInflationRate(inflation_rate));
        }
        Ok(())
    }

    /// Runs the forecast for `method`.
    ///
    /// `source` is only consulted for `ForecastMethod::InflationAdjusted`.
    ///
    /// # Errors
    ///
    /// Returns the error of the selected operation.
    pub fn run(
        data: &ExpenseData,
        method: ForecastMethod,
        source: &dyn IndicatorSource,
    ) -> Result<Forecast> {
        debug!(%method, categories = data.len(), "running forecast");

        let forecast = match method {
            ForecastMethod::Simple => Forecast::Simple {
                predictions: Self::simple_moving_average(data)?,
            },
            ForecastMethod::Weighted => Forecast::Weighted {
                predictions: Self::weighted_moving_average(data)?,
            },
            ForecastMethod::InflationAdjusted => {
                let (inflation_rate, predictions) =
                    Self::inflation_adjusted_from_source(data, source)?;
                Forecast::InflationAdjusted {
                    inflation_rate,
                    predictions,
                }
            }
        };

        Ok(forecast)
    }
}

/// Last `WINDOW_MONTHS` values of a series, or fewer if it is shorter.
fn trailing_window<'a>(category: &str, series: &'a [Decimal]) -> Result<&'a [Decimal]> {
    if series.is_empty() {
        return Err(ForecastError::EmptySeries {
            category: category.to_string(),
        });
    }
    Ok(&series[series.len().saturating_sub(WINDOW_MONTHS)..])
}

fn round_to_whole(category: &str, value: Decimal) -> Result<i64> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
        .ok_or_else(|| out_of_range(category))
}

fn out_of_range(category: &str) -> ForecastError {
    ForecastError::ValueOutOfRange {
        category: category.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::source::{FnIndicatorSource, StaticIndicatorSource};
    use crate::forecast::types::sample_expense_data;

    fn single(category: &str, values: &[i64]) -> ExpenseData {
        ExpenseData::from([(
            category.to_string(),
            values.iter().copied().map(Decimal::from).collect(),
        )])
    }

    #[test]
    fn test_simple_moving_average_sample() {
        let result = ForecastEngine::simple_moving_average(&sample_expense_data()).unwrap();

        assert_eq!(result["Office Supplies"], dec!(140));
        assert_eq!(result["Marketing"], dec!(220));
        assert_eq!(result["Utilities"], dec!(275) / dec!(3));
        assert_eq!(result["Utilities"].round_dp(2), dec!(91.67));
        assert_eq!(result["Rent"], dec!(1000));
    }

    #[test]
    fn test_weighted_moving_average_sample() {
        let result = ForecastEngine::weighted_moving_average(&sample_expense_data()).unwrap();

        // 0.2*150 + 0.3*130 + 0.5*140
        assert_eq!(result["Office Supplies"], 139);
        // 0.2*220 + 0.3*210 + 0.5*230
        assert_eq!(result["Marketing"], 222);
        // 0.2*100 + 0.3*85 + 0.5*90 = 90.5
        assert_eq!(result["Utilities"], 90);
        assert_eq!(result["Rent"], 1000);
    }

    #[test]
    fn test_inflation_adjusted_sample() {
        let result =
            ForecastEngine::inflation_adjusted(&sample_expense_data(), dec!(2.5)).unwrap();

        // 139 * 1.025 = 142.475
        assert_eq!(result["Office Supplies"], 142);
        // 222 * 1.025 = 227.55
        assert_eq!(result["Marketing"], 228);
        // 90 * 1.025 = 92.25
        assert_eq!(result["Utilities"], 92);
        assert_eq!(result["Rent"], 1025);
    }

    #[test]
    fn test_simple_short_series_divides_by_three() {
        let result = ForecastEngine::simple_moving_average(&single("Travel", &[90, 60])).unwrap();
        assert_eq!(result["Travel"], dec!(50));

        let result = ForecastEngine::simple_moving_average(&single("Travel", &[90])).unwrap();
        assert_eq!(result["Travel"], dec!(30));
    }

    #[test]
    fn test_weighted_short_series_pairs_weights_from_front() {
        // 0.2*100 + 0.3*200
        let result =
            ForecastEngine::weighted_moving_average(&single("Travel", &[100, 200])).unwrap();
        assert_eq!(result["Travel"], 80);

        // 0.2*100
        let result = ForecastEngine::weighted_moving_average(&single("Travel", &[100])).unwrap();
        assert_eq!(result["Travel"], 20);
    }

    #[test]
    fn test_weighted_rounds_half_to_even() {
        // 0.2*5 + 0.3*5 + 0.5*6 = 5.5
        let result =
            ForecastEngine::weighted_moving_average(&single("Postage", &[5, 5, 6])).unwrap();
        assert_eq!(result["Postage"], 6);

        // 0.2*5 + 0.3*5 + 0.5*4 = 4.5
        let result =
            ForecastEngine::weighted_moving_average(&single("Postage", &[5, 5, 4])).unwrap();
        assert_eq!(result["Postage"], 4);
    }

    #[test]
    fn test_empty_series_is_rejected() {
        let data = ExpenseData::from([("Payroll".to_string(), vec![])]);

        let expected = Err(ForecastError::EmptySeries {
            category: "Payroll".to_string(),
        });
        assert_eq!(ForecastEngine::simple_moving_average(&data), expected);
        assert_eq!(
            ForecastEngine::weighted_moving_average(&data).unwrap_err(),
            ForecastError::EmptySeries {
                category: "Payroll".to_string()
            }
        );
    }

    #[test]
    fn test_empty_data_yields_empty_result() {
        let data = ExpenseData::new();
        assert!(ForecastEngine::simple_moving_average(&data).unwrap().is_empty());
        assert!(ForecastEngine::weighted_moving_average(&data).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_inflation_rate() {
        let data = sample_expense_data();
        assert_eq!(
            ForecastEngine::inflation_adjusted(&data, dec!(-100.5)),
            Err(ForecastError::InvalidInflationRate(dec!(-100.5)))
        );
        assert!(ForecastEngine::inflation_adjusted(&data, dec!(1000.01)).is_err());
        assert!(ForecastEngine::inflation_adjusted(&data, dec!(-100)).is_ok());
        assert!(ForecastEngine::inflation_adjusted(&data, dec!(1000)).is_ok());
    }

    #[test]
    fn test_zero_inflation_matches_weighted() {
        let data = sample_expense_data();
        assert_eq!(
            ForecastEngine::inflation_adjusted(&data, Decimal::ZERO).unwrap(),
            ForecastEngine::weighted_moving_average(&data).unwrap()
        );
    }

    #[test]
    fn test_inflation_adjusted_from_source() {
        let source = StaticIndicatorSource::new(dec!(10));
        let (rate, result) =
            ForecastEngine::inflation_adjusted_from_source(&sample_expense_data(), &source)
                .unwrap();

        assert_eq!(rate, dec!(10));
        // 139 * 1.1 = 152.9
        assert_eq!(result["Office Supplies"], 153);
        assert_eq!(result["Rent"], 1100);
    }

    #[test]
    fn test_source_failure_propagates() {
        let source = FnIndicatorSource::new("offline", || {
            Err(ForecastError::IndicatorUnavailable {
                source_name: "offline",
                reason: "no network".to_string(),
            })
        });
        let result = ForecastEngine::run(
            &sample_expense_data(),
            ForecastMethod::InflationAdjusted,
            &source,
        );
        assert!(matches!(
            result,
            Err(ForecastError::IndicatorUnavailable { .. })
        ));
    }

    #[test]
    fn test_apply_seasonal_factor() {
        let weighted = ForecastEngine::weighted_moving_average(&sample_expense_data()).unwrap();
        let adjusted = ForecastEngine::apply_seasonal_factor(&weighted, dec!(1.15)).unwrap();

        // 139 * 1.15 = 159.85
        assert_eq!(adjusted["Office Supplies"], 160);
        assert_eq!(adjusted["Rent"], 1150);
        assert_eq!(
            ForecastEngine::apply_seasonal_factor(&weighted, Decimal::ONE).unwrap(),
            weighted
        );
    }

    #[test]
    fn test_seasonally_adjust_keeps_method() {
        let data = sample_expense_data();
        let source = StaticIndicatorSource::default();

        let simple = ForecastEngine::run(&data, ForecastMethod::Simple, &source).unwrap();
        let simple = ForecastEngine::seasonally_adjust(simple, dec!(0.95)).unwrap();
        assert_eq!(simple.method(), ForecastMethod::Simple);
        assert_eq!(simple.get("Office Supplies"), Some(dec!(133.00)));

        let adjusted =
            ForecastEngine::run(&data, ForecastMethod::InflationAdjusted, &source).unwrap();
        let adjusted = ForecastEngine::seasonally_adjust(adjusted, dec!(0.95)).unwrap();
        assert_eq!(adjusted.method(), ForecastMethod::InflationAdjusted);
        // 142 * 0.95 = 134.9
        assert_eq!(adjusted.get("Office Supplies"), Some(dec!(135)));
    }

    #[test]
    fn test_validate_history() {
        let data = sample_expense_data();
        assert!(ForecastEngine::validate_history(&data, 3).is_ok());
        assert!(ForecastEngine::validate_history(&data, 5).is_ok());

        assert_eq!(
            ForecastEngine::validate_history(&single("Travel", &[10, 20]), 3),
            Err(ForecastError::InsufficientHistory {
                category: "Travel".to_string(),
                needed: 3,
                got: 2,
            })
        );
        assert!(matches!(
            ForecastEngine::validate_history(&single("Travel", &[]), 1),
            Err(ForecastError::EmptySeries { .. })
        ));
    }

    #[test]
    fn test_run_dispatches_by_method() {
        let data = sample_expense_data();
        let source = StaticIndicatorSource::default();

        let simple = ForecastEngine::run(&data, ForecastMethod::Simple, &source).unwrap();
        assert_eq!(simple.method(), ForecastMethod::Simple);
        assert_eq!(simple.get("Office Supplies"), Some(dec!(140)));

        let weighted = ForecastEngine::run(&data, ForecastMethod::Weighted, &source).unwrap();
        assert_eq!(weighted.get("Office Supplies"), Some(dec!(139)));

        let adjusted =
            ForecastEngine::run(&data, ForecastMethod::InflationAdjusted, &source).unwrap();
        match adjusted {
            Forecast::InflationAdjusted {
                inflation_rate,
                predictions,
            } => {
                assert_eq!(inflation_rate, dec!(2.5));
                assert_eq!(predictions["Office Supplies"], 142);
            }
            other => panic!("unexpected forecast: {other:?}"),
        }
    }

    #[test]
    fn test_simple_average_overflow_is_out_of_range() {
        let half = Decimal::MAX / dec!(2);
        let data = ExpenseData::from([("Huge".to_string(), vec![half, half, half])]);
        assert_eq!(
            ForecastEngine::simple_moving_average(&data),
            Err(ForecastError::ValueOutOfRange {
                category: "Huge".to_string()
            })
        );
    }

    #[test]
    fn test_seasonal_factor_overflow_is_out_of_range() {
        let weighted = ForecastResult::from([("Huge".to_string(), i64::MAX)]);
        assert_eq!(
            ForecastEngine::apply_seasonal_factor(&weighted, Decimal::MAX),
            Err(ForecastError::ValueOutOfRange {
                category: "Huge".to_string()
            })
        );

        let simple = Forecast::Simple {
            predictions: ForecastResult::from([("Huge".to_string(), Decimal::MAX / dec!(2))]),
        };
        assert_eq!(
            ForecastEngine::seasonally_adjust(simple, dec!(3)),
            Err(ForecastError::ValueOutOfRange {
                category: "Huge".to_string()
            })
        );

        let adjusted = Forecast::InflationAdjusted {
            inflation_rate: dec!(2.5),
            predictions: ForecastResult::from([("Huge".to_string(), i64::MAX)]),
        };
        assert_eq!(
            ForecastEngine::seasonally_adjust(adjusted, dec!(2)),
            Err(ForecastError::ValueOutOfRange {
                category: "Huge".to_string()
            })
        );
    }

    #[test]
    fn test_out_of_range_value() {
        let data = ExpenseData::from([("Huge".to_string(), vec![Decimal::MAX])]);
        assert_eq!(
            ForecastEngine::weighted_moving_average(&data),
            Err(ForecastError::ValueOutOfRange {
                category: "Huge".to_string()
            })
        );
    }
}
