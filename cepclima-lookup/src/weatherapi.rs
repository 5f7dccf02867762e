//! WeatherAPI client for current conditions.
//!
//! `GET {base}/current.json?key=..&q=City, UF&aqi=no`. Status codes map onto the
//! error taxonomy: 400 unknown place, 401 bad key, 403 quota, anything else
//! non-200 is a transport failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use cepclima_core::error::{ClimaError, Result};
use cepclima_core::traits::WeatherLookup;
use cepclima_core::types::WeatherReading;

/// Default WeatherAPI base URL.
const DEFAULT_WEATHER_API_URL: &str = "http://api.weatherapi.com/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// WeatherAPI client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherApiConfig {
    /// Base URL including the API version
    pub base_url: String,
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for WeatherApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl WeatherApiConfig {
    /// Creates a configuration for the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_WEATHER_API_URL.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `current.json` payload, reduced to the fields we read.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CurrentPayload {
    location: LocationPart,
    current: CurrentPart,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocationPart {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CurrentPart {
    temp_c: f64,
    condition: ConditionPart,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConditionPart {
    text: String,
}

/// Error body WeatherAPI sends with 4xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorPayload {
    error: ErrorPart,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorPart {
    #[allow(dead_code)]
    code: i64,
    message: String,
}

impl From<CurrentPayload> for WeatherReading {
    fn from(payload: CurrentPayload) -> Self {
        WeatherReading {
            location_name: payload.location.name,
            temp_c: payload.current.temp_c,
            condition: payload.current.condition.text,
        }
    }
}

/// HTTP client for WeatherAPI.
pub struct WeatherApiClient {
    config: WeatherApiConfig,
    http_client: reqwest::Client,
}

impl WeatherApiClient {
    /// Creates a client against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(WeatherApiConfig::new(api_key))
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: WeatherApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cepclima/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClimaError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Fetches current conditions for a coordinate pair.
    pub async fn current_by_coordinates(&self, lat: f64, lon: f64) -> Result<WeatherReading> {
        self.current(&format!("{lat:.6},{lon:.6}")).await
    }
}

/// The request URL carries the API key, so it never reaches the message.
fn transport(context: &str, err: reqwest::Error) -> ClimaError {
    ClimaError::Transport(format!("{context}: {}", err.without_url()))
}

#[async_trait]
impl WeatherLookup for WeatherApiClient {
    #[instrument(skip(self))]
    async fn current(&self, place: &str) -> Result<WeatherReading> {
        let url = format!("{}/current.json", self.config.base_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("key", self.config.api_key.as_str()), ("q", place), ("aqi", "no")])
            .send()
            .await
            .map_err(|e| transport("WeatherAPI request failed", e))?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| transport("WeatherAPI body read failed", e))?;
                let payload: CurrentPayload = serde_json::from_slice(&body)?;
                let reading = WeatherReading::from(payload);

                if !reading.is_valid() {
                    warn!(place, "WeatherAPI payload lacks location name or temperature");
                    return Err(ClimaError::Transport(format!(
                        "incomplete WeatherAPI response for '{place}'"
                    )));
                }

                debug!(place, temp_c = reading.temp_c, "Fetched current weather");
                Ok(reading)
            }
            StatusCode::BAD_REQUEST => {
                // Body is optional; a 400 without it is still "not found"
                let reason = response
                    .json::<ErrorPayload>()
                    .await
                    .map(|e| e.error.message)
                    .unwrap_or_default();
                Err(ClimaError::PlaceNotFound {
                    place: place.to_string(),
                    reason,
                })
            }
            StatusCode::UNAUTHORIZED => Err(ClimaError::Auth("WeatherAPI rejected the API key".into())),
            StatusCode::FORBIDDEN => Err(ClimaError::Quota(
                "WeatherAPI quota exceeded or access denied".into(),
            )),
            status => {
                warn!(%status, place, "Unexpected WeatherAPI status");
                Err(ClimaError::Transport(format!("WeatherAPI returned HTTP {status}")))
            }
        }
    }
}
