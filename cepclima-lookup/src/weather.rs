//! Cache-aside resolution of places to current weather.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use cepclima_cache::{Namespace, Probe, TtlCache};
use cepclima_core::constants::WEATHER_TTL;
use cepclima_core::error::{ClimaError, Result};
use cepclima_core::traits::WeatherLookup;
use cepclima_core::types::WeatherReading;

/// Cache namespace for weather readings.
pub const WEATHER_NAMESPACE: Namespace = Namespace::new("weather");

/// Cache key for a place's weather: the full "City, UF" string.
pub fn weather_cache_key(place: &str) -> String {
    place.to_string()
}

/// Resolves places to current weather, caching successes for 10 minutes.
///
/// Failures are passed through unchanged; none of them is cached. A reading
/// without a place name or with exactly 0.0 °C is rejected as a transport
/// failure whichever collaborator produced it.
pub struct WeatherResolver {
    upstream: Arc<dyn WeatherLookup>,
    cache: Arc<TtlCache>,
    ttl: Duration,
}

impl WeatherResolver {
    /// Creates a resolver with the standard 10 minute TTL.
    pub fn new(upstream: Arc<dyn WeatherLookup>, cache: Arc<TtlCache>) -> Self {
        Self {
            upstream,
            cache,
            ttl: WEATHER_TTL,
        }
    }

    /// Overrides the cache TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Resolves current weather for `place`, consulting the cache first.
    #[instrument(skip(self))]
    pub async fn resolve(&self, place: &str) -> Result<WeatherReading> {
        let key = weather_cache_key(place);

        match self.cache.probe::<WeatherReading>(WEATHER_NAMESPACE, &key) {
            Probe::Hit(reading) => {
                debug!(temp_c = reading.temp_c, "Weather cache hit");
                return Ok(reading);
            }
            Probe::Expired => debug!("Weather cache entry expired"),
            Probe::Miss => debug!("Weather cache miss"),
        }

        let reading = self.upstream.current(place).await?;

        if !reading.is_valid() {
            warn!(temp_c = reading.temp_c, "Weather service answered without name or temperature");
            return Err(ClimaError::Transport(format!(
                "incomplete weather reading for '{place}'"
            )));
        }

        self.cache.set(WEATHER_NAMESPACE, &key, reading.clone(), self.ttl);
        info!(temp_c = reading.temp_c, condition = %reading.condition, "Resolved weather");

        Ok(reading)
    }

    /// Drops the cached reading for `place`.
    pub fn invalidate(&self, place: &str) {
        self.cache.invalidate(WEATHER_NAMESPACE, &weather_cache_key(place));
    }
}
