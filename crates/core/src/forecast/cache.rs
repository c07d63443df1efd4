//! Indicator caching using Moka.
//!
//! Wraps an `IndicatorSource` so repeated forecasts inside the TTL reuse the
//! last successful lookup instead of hitting the provider again.

use moka::sync::Cache;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::debug;

use super::error::Result;
use super::source::IndicatorSource;

/// Default time-to-live for cached indicator values (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

const INFLATION_RATE_KEY: &str = "inflation_rate";

/// Caching decorator for an indicator source.
///
/// Failed lookups are not cached.
pub struct CachedIndicatorSource<S> {
    inner: S,
    cache: Cache<&'static str, Decimal>,
}

impl<S: IndicatorSource> CachedIndicatorSource<S> {
    /// Wraps `inner` with the default 5 minute TTL.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL_SECS)
    }

    /// Wraps `inner` with a custom TTL in seconds.
    #[must_use]
    pub fn with_ttl(inner: S, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, cache }
    }

    /// Returns the wrapped source.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Drops every cached value.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl<S: IndicatorSource> IndicatorSource for CachedIndicatorSource<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn inflation_rate(&self) -> Result<Decimal> {
        if let Some(rate) = self.cache.get(INFLATION_RATE_KEY) {
            debug!(source = self.inner.name(), %rate, "inflation rate cache hit");
            return Ok(rate);
        }

        let rate = self.inner.inflation_rate()?;
        debug!(source = self.inner.name(), %rate, "inflation rate fetched");
        self.cache.insert(INFLATION_RATE_KEY, rate);

        Ok(rate)
    }
}
