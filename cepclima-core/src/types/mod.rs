//! Domain types for CEP Clima.
//!
//! - [`PostalCode`]: a normalized, validated 8-digit CEP
//! - [`Location`]: city and state resolved from a CEP
//! - [`WeatherReading`]: current conditions for a place
//! - [`TemperatureResult`]: the cacheable, externally visible artifact

mod location;
mod postal_code;
mod temperature;
mod weather;

pub use location::*;
pub use postal_code::*;
pub use temperature::*;
pub use weather::*;
