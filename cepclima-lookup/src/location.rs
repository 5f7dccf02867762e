//! Cache-aside resolution of postal codes to places.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use cepclima_cache::{Namespace, Probe, TtlCache};
use cepclima_core::constants::LOCATION_TTL;
use cepclima_core::error::{ClimaError, Result};
use cepclima_core::traits::LocationLookup;
use cepclima_core::types::{Location, PostalCode};

/// Cache namespace for resolved locations.
pub const LOCATION_NAMESPACE: Namespace = Namespace::new("location");

/// Cache key for a postal code's location.
pub fn location_cache_key(code: &PostalCode) -> String {
    code.as_str().to_string()
}

/// Resolves postal codes to places, caching successes for 24h.
///
/// Upstream "not found" arrives either as an explicit error or as a payload
/// without city/state; both become [`ClimaError::ZipcodeNotFound`].
pub struct LocationResolver {
    upstream: Arc<dyn LocationLookup>,
    cache: Arc<TtlCache>,
    ttl: Duration,
}

impl LocationResolver {
    /// Creates a resolver with the standard 24h TTL.
    pub fn new(upstream: Arc<dyn LocationLookup>, cache: Arc<TtlCache>) -> Self {
        Self {
            upstream,
            cache,
            ttl: LOCATION_TTL,
        }
    }

    /// Overrides the cache TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Resolves `code`, consulting the cache first.
    #[instrument(skip(self, code), fields(cep = %code))]
    pub async fn resolve(&self, code: &PostalCode) -> Result<Location> {
        let key = location_cache_key(code);

        match self.cache.probe::<Location>(LOCATION_NAMESPACE, &key) {
            Probe::Hit(location) => {
                debug!(city = %location.city, "Location cache hit");
                return Ok(location);
            }
            Probe::Expired => debug!("Location cache entry expired"),
            Probe::Miss => debug!("Location cache miss"),
        }

        let location = match self.upstream.lookup(code).await {
            Ok(location) => location,
            Err(e) if e.is_not_found() => return Err(ClimaError::ZipcodeNotFound(code.to_string())),
            Err(e) => return Err(e),
        };

        if !location.is_valid() {
            warn!("Location service answered without city or state");
            return Err(ClimaError::ZipcodeNotFound(code.to_string()));
        }

        self.cache.set(LOCATION_NAMESPACE, &key, location.clone(), self.ttl);
        info!(city = %location.city, uf = %location.region, "Resolved location");

        Ok(location)
    }

    /// Drops the cached location for `code`.
    pub fn invalidate(&self, code: &PostalCode) {
        self.cache.invalidate(LOCATION_NAMESPACE, &location_cache_key(code));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeLocations, LocationBehavior};
    use tokio_test::assert_err;

    fn cep(raw: &str) -> PostalCode {
        raw.parse().unwrap()
    }

    #[tokio::test]
    async fn test_resolve_caches_success() {
        let upstream = Arc::new(FakeLocations::found("São Paulo", "SP"));
        let cache = Arc::new(TtlCache::new());
        let resolver = LocationResolver::new(upstream.clone(), cache.clone());

        let first = resolver.resolve(&cep("01310100")).await.unwrap();
        let second = resolver.resolve(&cep("01310100")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.full_name(), "São Paulo, SP");
        assert_eq!(upstream.calls(), 1);
        assert!(cache.get::<Location>(LOCATION_NAMESPACE, "01310100").is_some());
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let upstream = Arc::new(FakeLocations::new(LocationBehavior::NotFound));
        let cache = Arc::new(TtlCache::new());
        let resolver = LocationResolver::new(upstream.clone(), cache.clone());

        let err = resolver.resolve(&cep("00000000")).await.unwrap_err();
        assert!(matches!(err, ClimaError::ZipcodeNotFound(ref c) if c == "00000000"));

        assert_err!(resolver.resolve(&cep("00000000")).await);
        assert_eq!(upstream.calls(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_payload_is_not_found() {
        let upstream = Arc::new(FakeLocations::found("São Paulo", ""));
        let resolver = LocationResolver::new(upstream, Arc::new(TtlCache::new()));

        let err = resolver.resolve(&cep("01310100")).await.unwrap_err();
        assert!(matches!(err, ClimaError::ZipcodeNotFound(_)));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let upstream = Arc::new(FakeLocations::new(LocationBehavior::Transport));
        let resolver = LocationResolver::new(upstream, Arc::new(TtlCache::new()));

        let err = resolver.resolve(&cep("01310100")).await.unwrap_err();
        assert!(matches!(err, ClimaError::Transport(_)));
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let upstream = Arc::new(FakeLocations::found("Curitiba", "PR"));
        let resolver = LocationResolver::new(upstream.clone(), Arc::new(TtlCache::new()))
            .with_ttl(Duration::from_millis(1));

        resolver.resolve(&cep("80010000")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        resolver.resolve(&cep("80010000")).await.unwrap();

        assert_eq!(upstream.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let upstream = Arc::new(FakeLocations::found("Curitiba", "PR"));
        let resolver = LocationResolver::new(upstream.clone(), Arc::new(TtlCache::new()));

        resolver.resolve(&cep("80010000")).await.unwrap();
        resolver.invalidate(&cep("80010000"));
        resolver.resolve(&cep("80010000")).await.unwrap();

        assert_eq!(upstream.calls(), 2);
    }
}
