//! # CEP Clima API Server
//!
//! HTTP boundary for the CEP to temperature lookup.
//!
//! ## Endpoints
//!
//! - `POST /` - Look up the current temperature for `{"cep": "..."}`
//! - `POST /temperature` - Same as `POST /`
//! - `GET /health` - Liveness plus cache statistics
//! - `GET /cache/stats` - Cache statistics
//!
//! ## Example
//!
//! ```rust,ignore
//! use cepclima_api::{ApiConfig, ApiServer};
//!
//! let config = ApiConfig::from_env()?;
//! let server = ApiServer::new(config)?;
//! server.run(([0, 0, 0, 0], 8081)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use dto::{CepRequest, HealthResponse};
pub use error::ApiError;
pub use routes::create_router;
pub use state::{parse_duration, ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use cepclima_core::error::Result;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// API server for CEP Clima.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server backed by the real upstream clients.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::from_state(AppState::new(config)?))
    }

    /// Creates a server around an existing state.
    pub fn from_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Shared application state.
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server until Ctrl+C or SIGTERM, then clears the cache.
    ///
    /// Expired cache entries are swept every `cache_cleanup` while serving.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("CEP Clima API server listening on {}", addr);

        let sweeper = self.state.spawn_cache_sweep();
        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await;
        sweeper.abort();
        served?;

        let cache = self.state.orchestrator.cache();
        let dropped = cache.len();
        cache.clear();
        info!(entries = dropped, "Server stopped, cache cleared");

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
