//! OpenCEP client for resolving postal codes to places.
//!
//! `GET {base}/v1/{cep}.json` returns the address behind a CEP. Only
//! `localidade` (city) and `uf` (state) matter here; unknown codes come back as
//! HTTP 404 or as a payload missing those fields.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use cepclima_core::error::{ClimaError, Result};
use cepclima_core::traits::LocationLookup;
use cepclima_core::types::{Location, PostalCode};

/// Default OpenCEP base URL.
const DEFAULT_OPENCEP_URL: &str = "https://opencep.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenCEP client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpenCepConfig {
    /// Base URL, without the `/v1` suffix
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for OpenCepConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENCEP_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl OpenCepConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OpenCEP address payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenCepPayload {
    localidade: String,
    uf: String,
    logradouro: String,
    bairro: String,
    ibge: String,
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl From<OpenCepPayload> for Location {
    fn from(payload: OpenCepPayload) -> Self {
        Location {
            city: payload.localidade,
            region: payload.uf,
            street: non_empty(payload.logradouro),
            district: non_empty(payload.bairro),
            ibge: non_empty(payload.ibge),
        }
    }
}

/// HTTP client for the OpenCEP API.
pub struct OpenCepClient {
    config: OpenCepConfig,
    http_client: reqwest::Client,
}

impl OpenCepClient {
    /// Creates a client against the public OpenCEP endpoint.
    pub fn new() -> Result<Self> {
        Self::with_config(OpenCepConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: OpenCepConfig) -> Result<Self> {
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

    fn url_for(&self, code: &PostalCode) -> String {
        format!("{}/v1/{}.json", self.config.base_url.trim_end_matches('/'), code)
    }
}

#[async_trait]
impl LocationLookup for OpenCepClient {
    #[instrument(skip(self, code), fields(cep = %code))]
    async fn lookup(&self, code: &PostalCode) -> Result<Location> {
        let response = self
            .http_client
            .get(self.url_for(code))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClimaError::Transport(format!("OpenCEP request failed: {}", e.without_url())))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                debug!("OpenCEP does not know this CEP");
                return Err(ClimaError::ZipcodeNotFound(code.to_string()));
            }
            status => {
                warn!(%status, "Unexpected OpenCEP status");
                return Err(ClimaError::Transport(format!("OpenCEP returned HTTP {status}")));
            }
        }

        let body = response.bytes().await.map_err(|e| {
            ClimaError::Transport(format!("OpenCEP body read failed: {}", e.without_url()))
        })?;
        let payload: OpenCepPayload = serde_json::from_slice(&body)?;

        Ok(payload.into())
    }
}
