//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use cepclima_cache::CacheStats;
use cepclima_core::types::TemperatureResult;
use tracing::{debug, info};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

const SERVICE_NAME: &str = "cepclima";

/// POST / and POST /temperature
pub async fn temperature(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CepRequest>, JsonRejection>,
) -> Result<Json<TemperatureResult>> {
    let Json(req) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected request body");
        ApiError::bad_request()
    })?;

    let outcome = state.orchestrator.lookup(&req.cep).await?;

    info!(
        cep = %outcome.postal_code,
        city = %outcome.result.city,
        cached = outcome.from_cache,
        "Temperature served"
    );
    Ok(Json(outcome.result))
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        service: SERVICE_NAME.into(),
        version: env!("CARGO_PKG_VERSION").into(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        cache_stats: state.cache().stats(),
    })
}

/// GET /cache/stats
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.cache().stats())
}
