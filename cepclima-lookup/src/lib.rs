//! # CEP Clima Lookup
//!
//! Resolves a postal code to a temperature by chaining two upstream services
//! through the namespaced TTL cache:
//!
//! 1. [`LocationResolver`]: CEP → city/state via OpenCEP (cached 24h)
//! 2. [`WeatherResolver`]: "City, UF" → current weather via WeatherAPI (cached 10m)
//! 3. [`LookupOrchestrator`]: validation, the composite `result` cache (10m),
//!    conversion and error mapping
//!
//! ## Example
//!
//! ```rust,ignore
//! let cache = Arc::new(TtlCache::new());
//! let orchestrator = LookupOrchestrator::new(
//!     Arc::new(OpenCepClient::new()?),
//!     Arc::new(WeatherApiClient::new("api-key")?),
//!     cache,
//! );
//! let outcome = orchestrator.lookup("01310-100").await?;
//! println!("{} {}°C", outcome.result.city, outcome.result.temp_c);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod location;
mod opencep;
mod orchestrator;
mod weather;
mod weatherapi;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use location::{location_cache_key, LocationResolver, LOCATION_NAMESPACE};
pub use opencep::{OpenCepClient, OpenCepConfig};
pub use orchestrator::{
    result_cache_key, LookupError, LookupErrorKind, LookupOrchestrator, LookupOutcome,
    LookupStage, OrchestratorConfig, RESULT_NAMESPACE,
};
pub use weather::{weather_cache_key, WeatherResolver, WEATHER_NAMESPACE};
pub use weatherapi::{WeatherApiClient, WeatherApiConfig};
