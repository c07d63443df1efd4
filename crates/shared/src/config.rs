//! Application configuration management.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Forecast configuration.
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Forecast configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Forecasting method (`simple`, `weighted` or `inflation_adjusted`).
    #[serde(default = "default_method")]
    pub method: String,
    /// Annual inflation rate in percent served by the static indicator source.
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: Decimal,
    /// Reject categories with fewer than three months of history.
    #[serde(default)]
    pub require_full_window: bool,
    /// Multiply integer forecasts by the current month's seasonal factor.
    #[serde(default)]
    pub apply_seasonal_factor: bool,
    /// Time-to-live for cached indicator lookups.
    #[serde(default = "default_indicator_cache_ttl")]
    pub indicator_cache_ttl_secs: u64,
}

fn default_method() -> String {
    "inflation_adjusted".to_string()
}

fn default_inflation_rate() -> Decimal {
    dec!(2.5)
}

fn default_indicator_cache_ttl() -> u64 {
    300 // 5 minutes
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            inflation_rate: default_inflation_rate(),
            require_full_window: false,
            apply_seasonal_factor: false,
            indicator_cache_ttl_secs: default_indicator_cache_ttl(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "spendcast=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest precedence first: `config/default.toml`,
    /// `config/{RUN_MODE}.toml`, then `SPENDCAST__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SPENDCAST").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
