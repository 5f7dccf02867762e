//! App state and environment configuration.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cepclima_cache::{CacheConfig, TtlCache};
use cepclima_core::constants::DEFAULT_LOOKUP_TIMEOUT;
use cepclima_core::error::{ClimaError, Result};
use cepclima_core::traits::{LocationLookup, WeatherLookup};
use cepclima_lookup::{
    LookupOrchestrator, OpenCepClient, OpenCepConfig, OrchestratorConfig, WeatherApiClient,
    WeatherApiConfig,
};
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

const DEFAULT_PORT: u16 = 8081;
const DEFAULT_WEATHER_API_URL: &str = "http://api.weatherapi.com/v1";
const DEFAULT_OPENCEP_API_URL: &str = "https://opencep.com";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);
const DEFAULT_CACHE_CLEANUP: Duration = Duration::from_secs(10 * 60);
const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Server configuration.
#[derive(Clone)]
pub struct ApiConfig {
    /// Listen port
    pub port: u16,
    /// WeatherAPI key
    pub weather_api_key: String,
    /// WeatherAPI base URL
    pub weather_api_url: String,
    /// OpenCEP base URL
    pub opencep_api_url: String,
    /// Per-request timeout of the upstream HTTP clients
    pub request_timeout: Duration,
    /// Deadline for one uncached lookup
    pub lookup_timeout: Duration,
    /// Cache default TTL
    pub cache_ttl: Duration,
    /// Interval of the expired-entry sweep
    pub cache_cleanup: Duration,
    /// Cache capacity
    pub cache_max_entries: usize,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("port", &self.port)
            .field("weather_api_key", &"<redacted>")
            .field("weather_api_url", &self.weather_api_url)
            .field("opencep_api_url", &self.opencep_api_url)
            .field("request_timeout", &self.request_timeout)
            .field("lookup_timeout", &self.lookup_timeout)
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_cleanup", &self.cache_cleanup)
            .field("cache_max_entries", &self.cache_max_entries)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            weather_api_key: String::new(),
            weather_api_url: DEFAULT_WEATHER_API_URL.into(),
            opencep_api_url: DEFAULT_OPENCEP_API_URL.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_cleanup: DEFAULT_CACHE_CLEANUP,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl ApiConfig {
    /// Reads configuration from the environment, loading `.env` first.
    ///
    /// Unset variables fall back to defaults; malformed ones are errors.
    /// Call [`ApiConfig::validate`] before serving.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ClimaError::Config(format!("PORT is not a valid port: {raw}")))?,
            None => defaults.port,
        };
        let cache_max_entries = match var("CACHE_MAX_ENTRIES") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ClimaError::Config(format!("CACHE_MAX_ENTRIES is not a number: {raw}"))
            })?,
            None => defaults.cache_max_entries,
        };
        let duration = |name: &str, default: Duration| -> Result<Duration> {
            match var(name) {
                Some(raw) => parse_duration(&raw)
                    .map_err(|e| ClimaError::Config(format!("{name}: {e}"))),
                None => Ok(default),
            }
        };

        Ok(Self {
            port,
            weather_api_key: var("WEATHER_API_KEY").unwrap_or_default(),
            weather_api_url: var("WEATHER_API_URL").unwrap_or(defaults.weather_api_url),
            opencep_api_url: var("OPENCEP_API_URL").unwrap_or(defaults.opencep_api_url),
            request_timeout: duration("REQUEST_TIMEOUT", defaults.request_timeout)?,
            lookup_timeout: duration("LOOKUP_TIMEOUT", defaults.lookup_timeout)?,
            cache_ttl: duration("CACHE_TTL", defaults.cache_ttl)?,
            cache_cleanup: duration("CACHE_CLEANUP", defaults.cache_cleanup)?,
            cache_max_entries,
        })
    }

    /// Checks that the configuration can serve requests.
    pub fn validate(&self) -> Result<()> {
        if self.weather_api_key.trim().is_empty() {
            return Err(ClimaError::Config("WEATHER_API_KEY is required".into()));
        }
        for (name, value) in [
            ("WEATHER_API_URL", &self.weather_api_url),
            ("OPENCEP_API_URL", &self.opencep_api_url),
        ] {
            let url = Url::parse(value)
                .map_err(|e| ClimaError::Config(format!("{name} is not a valid URL: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ClimaError::Config(format!("{name} must be http or https")));
            }
        }
        if self.cache_max_entries == 0 {
            return Err(ClimaError::Config("CACHE_MAX_ENTRIES must be positive".into()));
        }
        for (name, value) in [
            ("REQUEST_TIMEOUT", self.request_timeout),
            ("LOOKUP_TIMEOUT", self.lookup_timeout),
            ("CACHE_TTL", self.cache_ttl),
            ("CACHE_CLEANUP", self.cache_cleanup),
        ] {
            if value.is_zero() {
                return Err(ClimaError::Config(format!("{name} must be positive")));
            }
        }
        Ok(())
    }

    /// Cache settings derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.cache_max_entries,
            default_ttl_seconds: self.cache_ttl.as_secs(),
            ..CacheConfig::default()
        }
    }

    /// Orchestrator settings derived from this configuration.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            lookup_timeout: self.lookup_timeout,
            ..OrchestratorConfig::default()
        }
    }
}

/// Parses a duration the way Go's `time.ParseDuration` writes them:
/// `"250ms"`, `"90s"`, `"5m"`, `"1.5h"`, `"1m30s"`. A bare integer is seconds.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let invalid = || ClimaError::Config(format!("invalid duration: {raw:?}"));

    if raw.is_empty() {
        return Err(invalid());
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse().map(Duration::from_secs).map_err(|_| invalid());
    }

    let mut total = Duration::ZERO;
    let mut rest = raw;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);

        let value: f64 = number.parse().map_err(|_| invalid())?;
        let seconds = match unit {
            "ms" => value / 1000.0,
            "s" => value,
            "m" => value * 60.0,
            "h" => value * 3600.0,
            other => {
                return Err(ClimaError::Config(format!(
                    "invalid duration unit {other:?} in {raw:?}"
                )))
            }
        };
        total += Duration::try_from_secs_f64(seconds).map_err(|_| invalid())?;
        rest = tail;
    }
    Ok(total)
}

/// Shared state handed to every handler.
pub struct AppState {
    /// Active configuration
    pub config: ApiConfig,
    /// Lookup pipeline
    pub orchestrator: LookupOrchestrator,
    /// Process start, for uptime
    pub started_at: Instant,
}

impl AppState {
    /// Builds state around the real OpenCEP and WeatherAPI clients.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let locations = OpenCepClient::with_config(
            OpenCepConfig::new(&config.opencep_api_url).with_timeout(config.request_timeout),
        )?;
        let weather = WeatherApiClient::with_config(
            WeatherApiConfig::new(&config.weather_api_key)
                .with_base_url(&config.weather_api_url)
                .with_timeout(config.request_timeout),
        )?;
        Ok(Self::with_collaborators(config, Arc::new(locations), Arc::new(weather)))
    }

    /// Builds state around arbitrary collaborators.
    pub fn with_collaborators(
        config: ApiConfig,
        locations: Arc<dyn LocationLookup>,
        weather: Arc<dyn WeatherLookup>,
    ) -> Self {
        let cache = Arc::new(TtlCache::with_config(config.cache_config()));
        let orchestrator =
            LookupOrchestrator::with_config(locations, weather, cache, config.orchestrator_config());

        Self {
            config,
            orchestrator,
            started_at: Instant::now(),
        }
    }

    /// Shared cache.
    pub fn cache(&self) -> &Arc<TtlCache> {
        self.orchestrator.cache()
    }

    /// Starts the periodic sweep of expired cache entries.
    pub fn spawn_cache_sweep(&self) -> JoinHandle<()> {
        let every = self.config.cache_cleanup;
        debug!(interval = ?every, "Cache cleanup scheduled");
        self.cache().spawn_cleanup(every)
    }
}
