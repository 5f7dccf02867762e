//! Location resolved from a postal code.

use serde::{Deserialize, Serialize};

/// A place resolved from a postal code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// City name ("localidade")
    pub city: String,
    /// Two-letter state code ("uf")
    pub region: String,
    /// Street, when the upstream knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// Neighbourhood, when the upstream knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    /// IBGE municipality code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ibge: Option<String>,
}

impl Location {
    /// Creates a location with only city and state.
    pub fn new(city: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            region: region.into(),
            street: None,
            district: None,
            ibge: None,
        }
    }

    /// A location is usable only when both city and state are present.
    pub fn is_valid(&self) -> bool {
        !self.city.trim().is_empty() && !self.region.trim().is_empty()
    }

    /// Returns "City, UF", or just the city when the state is missing.
    ///
    /// This is the query string sent to the weather service and the key of the
    /// weather cache.
    pub fn full_name(&self) -> String {
        if self.region.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.region)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(Location::new("São Paulo", "SP").is_valid());
        assert!(!Location::new("", "SP").is_valid());
        assert!(!Location::new("São Paulo", "").is_valid());
        assert!(!Location::new("  ", "SP").is_valid());
    }

    #[test]
    fn test_full_name() {
        assert_eq!(Location::new("São Paulo", "SP").full_name(), "São Paulo, SP");
        assert_eq!(Location::new("Brasília", "").full_name(), "Brasília");
    }
}
