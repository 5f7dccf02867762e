//! CEP normalization and validation.
//!
//! Input is accepted loosely: every character that is not an ASCII digit is
//! stripped before validation, so `"01310-100"`, `" 013 101 00 "` and
//! `"013.101.00"` are all the same code.

use crate::constants::CEP_LENGTH;
use crate::error::{ClimaError, Result};
use crate::types::PostalCode;

/// Strips every character that is not an ASCII digit.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Checks that `code` is exactly 8 ASCII digits. Does not normalize.
pub fn validate(code: &str) -> Result<()> {
    if code.len() != CEP_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClimaError::InvalidZipcode(code.to_string()));
    }
    Ok(())
}

/// Normalizes then validates, returning the typed code.
pub fn validate_and_normalize(raw: &str) -> Result<PostalCode> {
    let normalized = normalize(raw);
    validate(&normalized).map_err(|_| ClimaError::InvalidZipcode(raw.to_string()))?;
    Ok(PostalCode::from_validated(normalized))
}
