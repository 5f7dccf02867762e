//! In-memory TTL cache partitioned by namespace.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::debug;

/// A logical partition of cache keys.
///
/// Two namespaces never see each other's entries, even for identical keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(&'static str);

impl Namespace {
    /// Creates a namespace. Names should be short lowercase words.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the namespace name.
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    fn qualify(&self, key: &str) -> String {
        format!("{}:{}", self.0, key)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Cache entry with TTL.
#[derive(Clone)]
struct CacheEntry {
    namespace: Namespace,
    value: Arc<dyn Any + Send + Sync>,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() >= self.ttl
    }
}

/// Outcome of a cache read that tells a miss apart from an expired entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Probe<T> {
    /// Live entry of the requested type
    Hit(T),
    /// Entry exists but its TTL has elapsed
    Expired,
    /// No entry, or an entry of a different type
    Miss,
}

impl<T> Probe<T> {
    /// Returns the value on a hit; expired and missing both become `None`.
    pub fn hit(self) -> Option<T> {
        match self {
            Probe::Hit(value) => Some(value),
            Probe::Expired | Probe::Miss => None,
        }
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries across all namespaces
    pub max_entries: usize,
    /// TTL used by [`TtlCache::set_default`], in seconds
    pub default_ttl_seconds: u64,
    /// Whether to drop expired entries before evicting live ones at capacity
    pub auto_cleanup: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            default_ttl_seconds: 3600,
            auto_cleanup: true,
        }
    }
}

/// In-memory cache shared by every request handler.
///
/// Thread-safe behind a single coarse lock. Expiration is checked lazily on
/// read; [`TtlCache::spawn_cleanup`] can additionally sweep expired entries to
/// bound memory.
pub struct TtlCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    config: CacheConfig,
}

impl TtlCache {
    /// Creates a new cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Returns the configured default TTL.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.config.default_ttl_seconds)
    }

    /// Reads `key` from `namespace`, distinguishing expired entries from misses.
    pub fn probe<T>(&self, namespace: Namespace, key: &str) -> Probe<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = self.entries.read();
        match entries.get(&namespace.qualify(key)) {
            None => Probe::Miss,
            Some(entry) if entry.is_expired() => Probe::Expired,
            Some(entry) => match entry.value.downcast_ref::<T>() {
                Some(value) => Probe::Hit(value.clone()),
                None => Probe::Miss,
            },
        }
    }

    /// Gets a live value. Expired entries behave as absent.
    pub fn get<T>(&self, namespace: Namespace, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.probe(namespace, key).hit()
    }

    /// Stores a value with the default TTL.
    pub fn set_default<T>(&self, namespace: Namespace, key: &str, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.set(namespace, key, value, self.default_ttl());
    }

    /// Stores a value, replacing any existing entry for the same key.
    pub fn set<T>(&self, namespace: Namespace, key: &str, value: T, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        let qualified = namespace.qualify(key);
        let mut entries = self.entries.write();

        if !entries.contains_key(&qualified) && entries.len() >= self.config.max_entries {
            if self.config.auto_cleanup {
                entries.retain(|_, e| !e.is_expired());
            }
            // Still at capacity? Remove oldest entry
            if entries.len() >= self.config.max_entries {
                if let Some(oldest_key) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.inserted_at)
                    .map(|(k, _)| k.clone())
                {
                    entries.remove(&oldest_key);
                }
            }
        }

        entries.insert(qualified, CacheEntry {
            namespace,
            value: Arc::new(value),
            inserted_at: Instant::now(),
            ttl,
        });
    }

    /// Removes a single entry.
    pub fn invalidate(&self, namespace: Namespace, key: &str) {
        self.entries.write().remove(&namespace.qualify(key));
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired());
        before - entries.len()
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns a best-effort snapshot of cache usage.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let mut per_namespace = BTreeMap::new();
        let mut expired = 0;

        for entry in entries.values() {
            if entry.is_expired() {
                expired += 1;
            } else {
                *per_namespace.entry(entry.namespace.as_str().to_string()).or_insert(0) += 1;
            }
        }

        CacheStats {
            total_items: entries.len() - expired,
            per_namespace,
            expired_items: expired,
            capacity: self.config.max_entries,
        }
    }

    /// Sweeps expired entries every `every` on the current tokio runtime.
    ///
    /// The task stops on its own once the cache is dropped.
    pub fn spawn_cleanup(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(strong) = cache.upgrade() else {
                    break;
                };
                let removed = strong.cleanup_expired();
                if removed > 0 {
                    debug!(removed, remaining = strong.len(), "Swept expired cache entries");
                }
            }
        })
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Live entries across all namespaces
    pub total_items: usize,
    /// Live entries per namespace
    pub per_namespace: BTreeMap<String, usize>,
    /// Entries past their TTL but not yet swept
    pub expired_items: usize,
    /// Maximum capacity
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITIES: Namespace = Namespace::new("cities");
    const TEMPS: Namespace = Namespace::new("temps");
    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_cache_set_get() {
        let cache = TtlCache::new();
        cache.set(CITIES, "01310100", "São Paulo".to_string(), HOUR);

        let city: Option<String> = cache.get(CITIES, "01310100");
        assert_eq!(city.as_deref(), Some("São Paulo"));
    }

    #[test]
    fn test_cache_miss() {
        let cache = TtlCache::new();
        assert_eq!(cache.get::<String>(CITIES, "00000000"), None);
        assert_eq!(cache.probe::<String>(CITIES, "00000000"), Probe::Miss);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let cache = TtlCache::new();
        cache.set(CITIES, "01310100", "São Paulo".to_string(), HOUR);
        cache.set(TEMPS, "01310100", 22.5_f64, HOUR);

        assert_eq!(cache.get::<String>(CITIES, "01310100").as_deref(), Some("São Paulo"));
        assert_eq!(cache.get::<f64>(TEMPS, "01310100"), Some(22.5));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_type_mismatch_is_a_miss() {
        let cache = TtlCache::new();
        cache.set(TEMPS, "x", 22.5_f64, HOUR);
        assert_eq!(cache.probe::<String>(TEMPS, "x"), Probe::Miss);
    }

    #[test]
    fn test_set_overwrites() {
        let cache = TtlCache::new();
        cache.set(TEMPS, "x", 1.0_f64, HOUR);
        cache.set(TEMPS, "x", 2.0_f64, HOUR);
        assert_eq!(cache.get::<f64>(TEMPS, "x"), Some(2.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_invalidate() {
        let cache = TtlCache::new();
        cache.set(CITIES, "a", "A".to_string(), HOUR);
        cache.set(TEMPS, "a", 1.0_f64, HOUR);

        cache.invalidate(CITIES, "a");

        assert!(cache.get::<String>(CITIES, "a").is_none());
        assert!(cache.get::<f64>(TEMPS, "a").is_some());
    }

    #[test]
    fn test_cache_clear() {
        let cache = TtlCache::new();
        cache.set(CITIES, "a", "A".to_string(), HOUR);
        cache.set(TEMPS, "b", 1.0_f64, HOUR);

        cache.clear();

        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_ttl_expiration() {
        let cache = TtlCache::new();
        cache.set(CITIES, "a", "A".to_string(), Duration::from_millis(1));

        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(cache.probe::<String>(CITIES, "a"), Probe::Expired);
        assert!(cache.get::<String>(CITIES, "a").is_none());
    }

    #[test]
    fn test_ttl_is_per_entry() {
        let cache = TtlCache::new();
        cache.set(CITIES, "short", "A".to_string(), Duration::from_millis(1));
        cache.set(CITIES, "long", "B".to_string(), HOUR);

        std::thread::sleep(Duration::from_millis(10));

        assert!(cache.get::<String>(CITIES, "short").is_none());
        assert!(cache.get::<String>(CITIES, "long").is_some());
    }

    #[test]
    fn test_set_default_uses_config_ttl() {
        let cache = TtlCache::with_config(CacheConfig {
            default_ttl_seconds: 0,
            ..CacheConfig::default()
        });
        cache.set_default(CITIES, "a", "A".to_string());
        assert!(cache.get::<String>(CITIES, "a").is_none());
    }

    #[test]
    fn test_cache_capacity_eviction() {
        let config = CacheConfig {
            max_entries: 2,
            default_ttl_seconds: 3600,
            auto_cleanup: true,
        };
        let cache = TtlCache::with_config(config);

        cache.set(CITIES, "alice", 1_u32, HOUR);
        std::thread::sleep(Duration::from_millis(2));
        cache.set(CITIES, "bob", 2_u32, HOUR);
        std::thread::sleep(Duration::from_millis(2));
        cache.set(CITIES, "charlie", 3_u32, HOUR);

        // Should have evicted oldest
        assert_eq!(cache.len(), 2);
        assert!(cache.get::<u32>(CITIES, "alice").is_none());
        assert_eq!(cache.get::<u32>(CITIES, "charlie"), Some(3));
    }

    #[test]
    fn test_cache_stats() {
        let cache = TtlCache::new();
        cache.set(CITIES, "a", "A".to_string(), HOUR);
        cache.set(CITIES, "b", "B".to_string(), HOUR);
        cache.set(TEMPS, "a", 1.0_f64, HOUR);
        cache.set(TEMPS, "gone", 1.0_f64, Duration::from_millis(1));

        std::thread::sleep(Duration::from_millis(10));

        let stats = cache.stats();
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.expired_items, 1);
        assert_eq!(stats.per_namespace.get("cities"), Some(&2));
        assert_eq!(stats.per_namespace.get("temps"), Some(&1));
        assert_eq!(stats.capacity, 10_000);
    }

    #[test]
    fn test_cache_cleanup_expired() {
        let cache = TtlCache::new();
        cache.set(CITIES, "a", "A".to_string(), Duration::from_millis(1));
        cache.set(CITIES, "b", "B".to_string(), HOUR);

        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get::<String>(CITIES, "b").is_some());
    }

    #[test]
    fn test_concurrent_writers() {
        let cache = Arc::new(TtlCache::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.set(TEMPS, &format!("{t}-{i}"), i as f64, HOUR);
                        let _ = cache.get::<f64>(TEMPS, &format!("{t}-{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 800);
    }

    #[tokio::test]
    async fn test_spawn_cleanup_sweeps() {
        let cache = Arc::new(TtlCache::new());
        cache.set(CITIES, "a", "A".to_string(), Duration::from_millis(1));
        cache.set(CITIES, "b", "B".to_string(), HOUR);

        let task = cache.spawn_cleanup(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(cache.len(), 1);
        task.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_stops_when_cache_dropped() {
        let cache = Arc::new(TtlCache::new());
        let task = cache.spawn_cleanup(Duration::from_millis(5));
        drop(cache);

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("cleanup task should finish")
            .unwrap();
    }
}
