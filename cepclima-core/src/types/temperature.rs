//! Final lookup result.

use serde::{Deserialize, Serialize};

/// Temperature of a city in three scales, each rounded to one decimal.
///
/// This is what the service returns and what the `result` cache namespace
/// stores. Treat it as immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResult {
    /// City name
    pub city: String,
    /// Celsius
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    /// Fahrenheit
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    /// Kelvin
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}
