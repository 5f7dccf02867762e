//! Interfaces for the two upstream collaborators.
//!
//! The resolvers and the orchestrator are generic over these traits, so tests
//! can substitute in-process fakes for the HTTP clients.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Location, PostalCode, WeatherReading};

// ═══════════════════════════════════════════════════════════════════════════════
// LOCATION LOOKUP
// ═══════════════════════════════════════════════════════════════════════════════

/// Maps a postal code to a place.
#[async_trait]
pub trait LocationLookup: Send + Sync {
    /// Looks up the place for `code`.
    ///
    /// Unknown codes yield [`ClimaError::ZipcodeNotFound`](crate::ClimaError::ZipcodeNotFound).
    /// Implementations may also return an incomplete [`Location`]; callers must
    /// check [`Location::is_valid`].
    async fn lookup(&self, code: &PostalCode) -> Result<Location>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// WEATHER LOOKUP
// ═══════════════════════════════════════════════════════════════════════════════

/// Maps a place to its current weather.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    /// Fetches current conditions for `place` ("City, UF").
    ///
    /// Failure classes:
    /// - unknown place: [`ClimaError::PlaceNotFound`](crate::ClimaError::PlaceNotFound)
    /// - bad credentials: [`ClimaError::Auth`](crate::ClimaError::Auth)
    /// - quota exceeded: [`ClimaError::Quota`](crate::ClimaError::Quota)
    /// - anything else: [`ClimaError::Transport`](crate::ClimaError::Transport)
    async fn current(&self, place: &str) -> Result<WeatherReading>;
}
