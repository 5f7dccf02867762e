//! End-to-end lookup: CEP in, temperature out.
//!
//! ```text
//! Validating → CacheCheck ─hit──────────────────────────────────────→ Responding
//!                  └─miss→ ResolvingLocation → ResolvingWeather → Converting → Caching → Responding
//! ```
//!
//! Every stage can exit straight to `Responding` with an error. Concurrent
//! misses for the same code are not coalesced; each one calls the upstreams and
//! the last write to the `result` namespace wins.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, instrument, warn};

use cepclima_cache::{CacheStats, Namespace, TtlCache};
use cepclima_core::constants::{
    DEFAULT_LOOKUP_TIMEOUT, LOCATION_TTL, MSG_INTERNAL_ERROR, MSG_INVALID_ZIPCODE,
    MSG_ZIPCODE_NOT_FOUND, RESULT_TTL, WEATHER_TTL,
};
use cepclima_core::convert;
use cepclima_core::error::ClimaError;
use cepclima_core::traits::{LocationLookup, WeatherLookup};
use cepclima_core::types::{PostalCode, TemperatureResult};
use cepclima_core::validator;

use crate::location::LocationResolver;
use crate::weather::WeatherResolver;

/// Cache namespace for final results.
pub const RESULT_NAMESPACE: Namespace = Namespace::new("result");

/// Cache key for a postal code's final result.
pub fn result_cache_key(code: &PostalCode) -> String {
    code.as_str().to_string()
}

/// Pipeline stage, used to tag logs and errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupStage {
    /// Normalizing and validating the raw input
    Validating,
    /// Looking for a cached final result
    CacheCheck,
    /// Resolving the CEP to a place
    ResolvingLocation,
    /// Resolving the place to current weather
    ResolvingWeather,
    /// Converting Celsius to the other scales
    Converting,
    /// Storing the final result
    Caching,
    /// Producing the response
    Responding,
}

impl fmt::Display for LookupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupStage::Validating => "validating",
            LookupStage::CacheCheck => "cache_check",
            LookupStage::ResolvingLocation => "resolving_location",
            LookupStage::ResolvingWeather => "resolving_weather",
            LookupStage::Converting => "converting",
            LookupStage::Caching => "caching",
            LookupStage::Responding => "responding",
        };
        f.write_str(name)
    }
}

/// What the caller is told about a failed lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupErrorKind {
    /// Input is not a valid CEP (422)
    InvalidZipcode,
    /// CEP or its place is unknown upstream (404)
    NotFound,
    /// Anything else (500)
    Internal,
}

impl LookupErrorKind {
    /// Classifies an error from any stage.
    pub fn of(err: &ClimaError) -> Self {
        if err.is_validation_error() {
            LookupErrorKind::InvalidZipcode
        } else if err.is_not_found() {
            LookupErrorKind::NotFound
        } else {
            LookupErrorKind::Internal
        }
    }

    /// HTTP status code for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            LookupErrorKind::InvalidZipcode => 422,
            LookupErrorKind::NotFound => 404,
            LookupErrorKind::Internal => 500,
        }
    }

    /// Message safe to show to the caller. Never contains upstream text.
    pub fn message(&self) -> &'static str {
        match self {
            LookupErrorKind::InvalidZipcode => MSG_INVALID_ZIPCODE,
            LookupErrorKind::NotFound => MSG_ZIPCODE_NOT_FOUND,
            LookupErrorKind::Internal => MSG_INTERNAL_ERROR,
        }
    }
}

/// A failed lookup: where it failed, how to report it, and the cause.
#[derive(Debug, Error)]
#[error("lookup failed while {stage}: {source}")]
pub struct LookupError {
    /// Stage that failed
    pub stage: LookupStage,
    /// Caller-facing classification
    pub kind: LookupErrorKind,
    /// Underlying error, for logs only
    pub source: ClimaError,
}

impl LookupError {
    fn at(stage: LookupStage, source: ClimaError) -> Self {
        Self {
            stage,
            kind: LookupErrorKind::of(&source),
            source,
        }
    }

    /// HTTP status code to answer with.
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// Caller-facing message.
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

/// A successful lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupOutcome {
    /// Normalized postal code
    pub postal_code: PostalCode,
    /// Temperature in three scales
    pub result: TemperatureResult,
    /// Whether the result came from the `result` namespace
    pub from_cache: bool,
}

/// TTLs and deadline for the pipeline.
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// TTL of the `location` namespace
    pub location_ttl: Duration,
    /// TTL of the `weather` namespace
    pub weather_ttl: Duration,
    /// TTL of the `result` namespace
    pub result_ttl: Duration,
    /// Deadline for the whole location + weather chain
    pub lookup_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            location_ttl: LOCATION_TTL,
            weather_ttl: WEATHER_TTL,
            result_ttl: RESULT_TTL,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

/// Composes validation, both resolvers, conversion and the result cache.
pub struct LookupOrchestrator {
    locations: LocationResolver,
    weather: WeatherResolver,
    cache: Arc<TtlCache>,
    config: OrchestratorConfig,
}

impl LookupOrchestrator {
    /// Creates an orchestrator with the standard TTL policy.
    pub fn new(
        location_lookup: Arc<dyn LocationLookup>,
        weather_lookup: Arc<dyn WeatherLookup>,
        cache: Arc<TtlCache>,
    ) -> Self {
        Self::with_config(location_lookup, weather_lookup, cache, OrchestratorConfig::default())
    }

    /// Creates an orchestrator with custom TTLs and deadline.
    pub fn with_config(
        location_lookup: Arc<dyn LocationLookup>,
        weather_lookup: Arc<dyn WeatherLookup>,
        cache: Arc<TtlCache>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            locations: LocationResolver::new(location_lookup, cache.clone())
                .with_ttl(config.location_ttl),
            weather: WeatherResolver::new(weather_lookup, cache.clone())
                .with_ttl(config.weather_ttl),
            cache,
            config,
        }
    }

    /// The shared cache.
    pub fn cache(&self) -> &Arc<TtlCache> {
        &self.cache
    }

    /// Snapshot of cache usage.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Forgets the cached final result for `code`. Location and weather entries
    /// are kept.
    pub fn invalidate_result(&self, code: &PostalCode) {
        self.cache.invalidate(RESULT_NAMESPACE, &result_cache_key(code));
    }

    /// Runs the full pipeline for a raw, possibly unnormalized, CEP.
    #[instrument(skip(self))]
    pub async fn lookup(&self, raw_cep: &str) -> Result<LookupOutcome, LookupError> {
        debug!(stage = %LookupStage::Validating);
        let code = validator::validate_and_normalize(raw_cep)
            .map_err(|e| self.fail(LookupStage::Validating, e))?;

        debug!(stage = %LookupStage::CacheCheck, cep = %code);
        let key = result_cache_key(&code);
        if let Some(result) = self.cache.get::<TemperatureResult>(RESULT_NAMESPACE, &key) {
            debug!(cep = %code, stage = %LookupStage::Responding, "Result cache hit");
            return Ok(LookupOutcome {
                postal_code: code,
                result,
                from_cache: true,
            });
        }

        let deadline = Instant::now() + self.config.lookup_timeout;

        debug!(stage = %LookupStage::ResolvingLocation, cep = %code);
        let location = self
            .within(deadline, LookupStage::ResolvingLocation, self.locations.resolve(&code))
            .await?;

        let place = location.full_name();
        debug!(stage = %LookupStage::ResolvingWeather, %place);
        let reading = self
            .within(deadline, LookupStage::ResolvingWeather, self.weather.resolve(&place))
            .await?;

        debug!(stage = %LookupStage::Converting, temp_c = reading.temp_c);
        let result = convert::convert_all(reading.temp_c, location.city.as_str());

        debug!(stage = %LookupStage::Caching);
        self.cache
            .set(RESULT_NAMESPACE, &key, result.clone(), self.config.result_ttl);

        info!(
            cep = %code,
            city = %result.city,
            temp_c = result.temp_c,
            stage = %LookupStage::Responding,
            "Lookup complete"
        );

        Ok(LookupOutcome {
            postal_code: code,
            result,
            from_cache: false,
        })
    }

    async fn within<T, F>(&self, deadline: Instant, stage: LookupStage, step: F) -> Result<T, LookupError>
    where
        F: std::future::Future<Output = cepclima_core::Result<T>>,
    {
        match timeout_at(deadline, step).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(self.fail(stage, e)),
            Err(_) => Err(self.fail(
                stage,
                ClimaError::Timeout {
                    seconds: self.config.lookup_timeout.as_secs(),
                },
            )),
        }
    }

    fn fail(&self, stage: LookupStage, source: ClimaError) -> LookupError {
        let err = LookupError::at(stage, source);
        match err.kind {
            LookupErrorKind::Internal => warn!(%stage, error = %err.source, "Lookup failed"),
            _ => debug!(%stage, error = %err.source, "Lookup rejected"),
        }
        err
    }
}
