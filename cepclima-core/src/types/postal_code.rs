//! Validated postal code.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ClimaError;
use crate::validator;

/// A Brazilian postal code (CEP): exactly 8 ASCII digits.
///
/// Only constructible through [`validator::validate_and_normalize`] (or
/// [`FromStr`], which delegates to it), so holding a `PostalCode` proves the
/// value passed validation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostalCode(String);

impl PostalCode {
    /// Wraps an already validated string.
    pub(crate) fn from_validated(digits: String) -> Self {
        debug_assert!(validator::validate(&digits).is_ok());
        Self(digits)
    }

    /// Returns the 8 digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the conventional `NNNNN-NNN` rendering.
    pub fn formatted(&self) -> String {
        format!("{}-{}", &self.0[..5], &self.0[5..])
    }

    /// Consumes the code, returning the digits.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PostalCode {
    type Err = ClimaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validator::validate_and_normalize(s)
    }
}

impl Serialize for PostalCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        let cep: PostalCode = "01310-100".parse().unwrap();
        assert_eq!(cep.as_str(), "01310100");
        assert_eq!(cep.to_string(), "01310100");
        assert!("1234".parse::<PostalCode>().is_err());
    }

    #[test]
    fn test_formatted() {
        let cep: PostalCode = "01310100".parse().unwrap();
        assert_eq!(cep.formatted(), "01310-100");
    }

    #[test]
    fn test_serialize_as_plain_string() {
        let cep: PostalCode = "01310100".parse().unwrap();
        assert_eq!(serde_json::to_string(&cep).unwrap(), "\"01310100\"");
    }
}
