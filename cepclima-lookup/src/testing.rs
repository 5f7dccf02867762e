//! In-process fake collaborators with call counters.
//!
//! Enabled for this crate's tests and, through the `test-util` feature, for
//! downstream crates that exercise the lookup pipeline without network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use cepclima_core::error::{ClimaError, Result};
use cepclima_core::traits::{LocationLookup, WeatherLookup};
use cepclima_core::types::{Location, PostalCode, WeatherReading};

/// How a [`FakeLocations`] answers.
#[derive(Clone, Debug)]
pub enum LocationBehavior {
    /// Returns this location (possibly incomplete)
    Found(Location),
    /// Reports the code as unknown
    NotFound,
    /// Fails with a transport error
    Transport,
    /// Never answers
    Hang,
}

/// Fake location service.
#[derive(Debug)]
pub struct FakeLocations {
    behavior: LocationBehavior,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeLocations {
    /// Creates a fake with the given behavior.
    pub fn new(behavior: LocationBehavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a fake that always returns `city`/`region`.
    pub fn found(city: &str, region: &str) -> Self {
        Self::new(LocationBehavior::Found(Location::new(city, region)))
    }

    /// Delays every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of lookups received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationLookup for FakeLocations {
    async fn lookup(&self, code: &PostalCode) -> Result<Location> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.behavior {
            LocationBehavior::Found(location) => Ok(location.clone()),
            LocationBehavior::NotFound => Err(ClimaError::ZipcodeNotFound(code.to_string())),
            LocationBehavior::Transport => Err(ClimaError::Transport("connection reset".into())),
            LocationBehavior::Hang => std::future::pending().await,
        }
    }
}

/// How a [`FakeWeather`] answers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WeatherBehavior {
    /// Returns a valid reading with this Celsius temperature
    Reading(f64),
    /// Reports the place as unknown
    NotFound,
    /// Rejects the credentials
    Auth,
    /// Reports the quota as exhausted
    Quota,
    /// Fails with a transport error
    Transport,
    /// Never answers
    Hang,
}

/// Fake weather service.
#[derive(Debug)]
pub struct FakeWeather {
    behavior: WeatherBehavior,
    calls: AtomicUsize,
}

impl FakeWeather {
    /// Creates a fake with the given behavior.
    pub fn new(behavior: WeatherBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a fake that always reports `temp_c`.
    pub fn reading(temp_c: f64) -> Self {
        Self::new(WeatherBehavior::Reading(temp_c))
    }

    /// Number of lookups received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherLookup for FakeWeather {
    async fn current(&self, place: &str) -> Result<WeatherReading> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            WeatherBehavior::Reading(temp_c) => Ok(WeatherReading::new(place, temp_c, "Clear")),
            WeatherBehavior::NotFound => Err(ClimaError::PlaceNotFound {
                place: place.to_string(),
                reason: "No matching location found.".into(),
            }),
            WeatherBehavior::Auth => Err(ClimaError::Auth("API key invalid".into())),
            WeatherBehavior::Quota => Err(ClimaError::Quota("quota exceeded".into())),
            WeatherBehavior::Transport => Err(ClimaError::Transport("HTTP 502".into())),
            WeatherBehavior::Hang => std::future::pending().await,
        }
    }
}
