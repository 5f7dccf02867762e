//! Error types for CEP Clima.
//!
//! Every lookup failure is one variant of [`ClimaError`]. Callers match on the
//! variant (or use the classification helpers) instead of inspecting messages.

use thiserror::Error;

/// Result type alias using `ClimaError`.
pub type Result<T> = std::result::Result<T, ClimaError>;

/// Main error type for all CEP Clima operations.
#[derive(Debug, Error)]
pub enum ClimaError {
    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input is not an 8-digit postal code after normalization.
    #[error("invalid zipcode: {0:?}")]
    InvalidZipcode(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NOT FOUND
    // ═══════════════════════════════════════════════════════════════════════════

    /// The location service does not know the postal code, or answered with an
    /// incomplete payload.
    #[error("CEP {0} not found")]
    ZipcodeNotFound(String),

    /// The weather service does not recognise the place.
    #[error("location '{place}' not found: {reason}")]
    PlaceNotFound {
        /// Place that was queried ("City, UF")
        place: String,
        /// Upstream explanation, if any
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // UPSTREAM FAILURES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Upstream rejected our credentials.
    #[error("upstream authentication failed: {0}")]
    Auth(String),

    /// Upstream quota exceeded or access denied.
    #[error("upstream quota exceeded: {0}")]
    Quota(String),

    /// Any other upstream failure: connection, unexpected status, bad payload.
    #[error("upstream transport error: {0}")]
    Transport(String),

    /// The lookup chain exceeded its deadline.
    #[error("lookup timed out after {seconds}s")]
    Timeout {
        /// Deadline that elapsed
        seconds: u64,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION & INTERNAL
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ClimaError {
    /// Returns true if the postal code or its location is unknown upstream.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClimaError::ZipcodeNotFound(_) | ClimaError::PlaceNotFound { .. }
        )
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ClimaError::InvalidZipcode(_))
    }

    /// Returns true if a dependency failed (collapses to an internal error at
    /// the HTTP boundary).
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            ClimaError::Auth(_)
                | ClimaError::Quota(_)
                | ClimaError::Transport(_)
                | ClimaError::Timeout { .. }
                | ClimaError::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClimaError::PlaceNotFound {
            place: "Atlantis, XX".into(),
            reason: "No matching location found.".into(),
        };
        assert!(err.to_string().contains("Atlantis, XX"));
        assert!(err.to_string().contains("No matching"));

        let err = ClimaError::Timeout { seconds: 30 };
        assert_eq!(err.to_string(), "lookup timed out after 30s");
    }

    #[test]
    fn test_error_classification() {
        assert!(ClimaError::ZipcodeNotFound("00000000".into()).is_not_found());
        assert!(ClimaError::PlaceNotFound {
            place: "x".into(),
            reason: String::new(),
        }
        .is_not_found());
        assert!(!ClimaError::Auth("bad key".into()).is_not_found());

        assert!(ClimaError::Auth("bad key".into()).is_upstream_failure());
        assert!(ClimaError::Quota("limit".into()).is_upstream_failure());
        assert!(ClimaError::Transport("reset".into()).is_upstream_failure());
        assert!(ClimaError::Timeout { seconds: 1 }.is_upstream_failure());
        assert!(!ClimaError::InvalidZipcode("1".into()).is_upstream_failure());

        assert!(ClimaError::InvalidZipcode("abc".into()).is_validation_error());
        assert!(!ClimaError::Internal("x".into()).is_validation_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("invalid");
        let clima_result: Result<serde_json::Value> = json_result.map_err(ClimaError::from);
        assert!(matches!(clima_result, Err(ClimaError::Json(_))));
    }
}
