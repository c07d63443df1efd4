//! Spendcast forecast runner
//!
//! Forecasts next month's expenses for the built-in sample dataset and
//! prints the result as JSON on stdout. Logs go to stderr.

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use spendcast_core::forecast::{
    CachedIndicatorSource, EconomicIndicators, Forecast, ForecastEngine, ForecastMethod,
    StaticIndicatorSource, WINDOW_MONTHS, sample_expense_data,
};
use spendcast_shared::{AppConfig, AppResult, LoggingConfig};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let forecast = match run(&config) {
        Ok(forecast) => forecast,
        Err(err) => {
            error!(code = err.error_code(), "{err}");
            std::process::exit(err.exit_code());
        }
    };

    println!("{}", serde_json::to_string_pretty(&forecast)?);

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run(config: &AppConfig) -> AppResult<Forecast> {
    let settings = &config.forecast;
    let method: ForecastMethod = settings.method.parse()?;
    let data = sample_expense_data();

    if settings.require_full_window {
        ForecastEngine::validate_history(&data, WINDOW_MONTHS)?;
    }

    let source = CachedIndicatorSource::with_ttl(
        StaticIndicatorSource::new(settings.inflation_rate),
        settings.indicator_cache_ttl_secs,
    );
    let mut forecast = ForecastEngine::run(&data, method, &source)?;

    if settings.apply_seasonal_factor {
        let indicators = EconomicIndicators::current();
        info!(seasonal_factor = %indicators.seasonal_factor, "Applying seasonal factor");
        forecast = ForecastEngine::seasonally_adjust(forecast, indicators.seasonal_factor)?;
    }

    info!(
        %method,
        categories = forecast.categories().len(),
        "Forecast complete"
    );

    Ok(forecast)
}
