//! Current weather for a place.

use serde::{Deserialize, Serialize};

/// Current conditions reported by the weather service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Place name as the weather service understood it
    pub location_name: String,
    /// Temperature in Celsius
    pub temp_c: f64,
    /// Human-readable condition ("Partly cloudy")
    pub condition: String,
}

impl WeatherReading {
    /// Creates a reading.
    pub fn new(location_name: impl Into<String>, temp_c: f64, condition: impl Into<String>) -> Self {
        Self {
            location_name: location_name.into(),
            temp_c,
            condition: condition.into(),
        }
    }

    /// A reading is usable only with a place name and a non-zero temperature.
    ///
    /// Known quirk: exactly 0.0 °C is treated as "no temperature reported", so
    /// a place that really sits at freezing point is rejected. Kept for output
    /// compatibility with existing clients.
    pub fn is_valid(&self) -> bool {
        !self.location_name.is_empty() && self.temp_c != 0.0
    }
}
