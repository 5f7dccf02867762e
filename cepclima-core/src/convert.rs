//! Temperature conversion.
//!
//! Pure arithmetic from Celsius to Fahrenheit and Kelvin. Kelvin uses an offset
//! of 273 (see [`KELVIN_OFFSET`]).

use serde::{Deserialize, Serialize};

use crate::constants::{KELVIN_OFFSET, MAX_PLAUSIBLE_CELSIUS, MIN_PLAUSIBLE_CELSIUS};
use crate::types::TemperatureResult;

/// F = C * 1.8 + 32
pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

/// K = C + 273
pub fn to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// C = (F - 32) / 1.8
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) / 1.8
}

/// C = K - 273
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Rounds to one decimal place, halves away from zero.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Builds the final result, rounding each scale independently.
pub fn convert_all(celsius: f64, city: impl Into<String>) -> TemperatureResult {
    TemperatureResult {
        city: city.into(),
        temp_c: round_one_decimal(celsius),
        temp_f: round_one_decimal(to_fahrenheit(celsius)),
        temp_k: round_one_decimal(to_kelvin(celsius)),
    }
}

/// Whether a Celsius value is within surface-of-Earth limits (-100..=60).
///
/// Not applied by the lookup pipeline; available to callers that want it.
pub fn is_plausible(celsius: f64) -> bool {
    (MIN_PLAUSIBLE_CELSIUS..=MAX_PLAUSIBLE_CELSIUS).contains(&celsius)
}

/// Coarse description of how a temperature feels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureBand {
    /// Below 0 °C
    Freezing,
    /// 0 to 10 °C
    Cold,
    /// 10 to 20 °C
    Cool,
    /// 20 to 25 °C
    Pleasant,
    /// 25 to 30 °C
    Warm,
    /// 30 to 35 °C
    Hot,
    /// 35 °C and above
    Scorching,
}

impl TemperatureBand {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TemperatureBand::Freezing => "freezing",
            TemperatureBand::Cold => "cold",
            TemperatureBand::Cool => "cool",
            TemperatureBand::Pleasant => "pleasant",
            TemperatureBand::Warm => "warm",
            TemperatureBand::Hot => "hot",
            TemperatureBand::Scorching => "scorching",
        }
    }
}

/// Classifies a Celsius temperature.
pub fn describe(celsius: f64) -> TemperatureBand {
    match celsius {
        c if c < 0.0 => TemperatureBand::Freezing,
        c if c < 10.0 => TemperatureBand::Cold,
        c if c < 20.0 => TemperatureBand::Cool,
        c if c < 25.0 => TemperatureBand::Pleasant,
        c if c < 30.0 => TemperatureBand::Warm,
        c if c < 35.0 => TemperatureBand::Hot,
        _ => TemperatureBand::Scorching,
    }
}
