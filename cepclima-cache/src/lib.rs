//! Namespaced TTL cache for CEP Clima.
//!
//! One in-memory store partitioned into namespaces, each entry carrying its
//! own TTL. Values of different types can live side by side; reads are typed.

mod cache;

pub use cache::{CacheConfig, CacheStats, Namespace, Probe, TtlCache};
