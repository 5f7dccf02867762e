//! DTOs for API requests and responses.

use cepclima_cache::CacheStats;
use serde::{Deserialize, Serialize};

/// Body of `POST /` and `POST /temperature`.
#[derive(Debug, Deserialize)]
pub struct CepRequest {
    /// Postal code, with or without the hyphen
    pub cep: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version
    pub version: String,
    /// Current time, RFC 3339 UTC
    pub timestamp: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Cache usage
    pub cache_stats: CacheStats,
}

/// Error body. Only the caller-facing message, never upstream detail.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Message
    pub message: String,
}
