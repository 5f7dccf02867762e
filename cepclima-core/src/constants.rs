//! Service constants for CEP Clima.
//!
//! Cache TTL policy, user-facing messages and conversion constants live here so
//! the HTTP boundary and the orchestrator agree on them.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// POSTAL CODES
// ═══════════════════════════════════════════════════════════════════════════════

/// Number of digits in a normalized CEP.
pub const CEP_LENGTH: usize = 8;

// ═══════════════════════════════════════════════════════════════════════════════
// USER-FACING MESSAGES
// ═══════════════════════════════════════════════════════════════════════════════

/// Message returned for malformed or invalid postal codes.
pub const MSG_INVALID_ZIPCODE: &str = "invalid zipcode";

/// Message returned when the postal code or its location cannot be resolved.
pub const MSG_ZIPCODE_NOT_FOUND: &str = "can not find zipcode";

/// Message returned for any upstream or internal failure.
pub const MSG_INTERNAL_ERROR: &str = "internal server error";

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE TTL POLICY
// ═══════════════════════════════════════════════════════════════════════════════

/// Locations rarely change.
pub const LOCATION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Weather changes frequently.
pub const WEATHER_TTL: Duration = Duration::from_secs(10 * 60);

/// Composite results are short-lived.
pub const RESULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Upper bound for the whole location + weather chain of a single request.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

// ═══════════════════════════════════════════════════════════════════════════════
// TEMPERATURE CONVERSION
// ═══════════════════════════════════════════════════════════════════════════════

/// Kelvin offset. Deliberately 273, not 273.15, for output compatibility.
pub const KELVIN_OFFSET: f64 = 273.0;

/// Lowest Celsius value considered plausible at the Earth's surface.
pub const MIN_PLAUSIBLE_CELSIUS: f64 = -100.0;

/// Highest Celsius value considered plausible at the Earth's surface.
pub const MAX_PLAUSIBLE_CELSIUS: f64 = 60.0;
