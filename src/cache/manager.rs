/// Generic in-memory cache with TTL and LRU eviction
///
/// Thread-safe, generic over key/value types. Time comes from a [`Clock`] so
/// expiry is testable without sleeping. Tracks metrics for monitoring.

use super::config::CacheConfig;
use crate::clock::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

/// Cache entry with TTL tracking
struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

/// Cache metrics for monitoring
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub inserts: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct CacheState<K, V> {
    data: HashMap<K, CacheEntry<V>>,
    access_order: VecDeque<K>, // front = least recently used
    metrics: CacheMetrics,
}

/// Generic cache manager
pub struct CacheManager<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    state: RwLock<CacheState<K, V>>,
}

impl<K, V> CacheManager<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Create new cache with given configuration, using the wall clock
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            state: RwLock::new(CacheState {
                data: HashMap::new(),
                access_order: VecDeque::new(),
                metrics: CacheMetrics::default(),
            }),
        }
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(entry.inserted_at);
        match age.to_std() {
            Ok(age) => age >= self.config.ttl,
            // Entry from the future (clock moved backwards): treat as fresh
            Err(_) => false,
        }
    }

    /// Get value from cache (returns None if expired or missing)
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut state = self.state.write();

        let expired = match state.data.get(key) {
            Some(entry) => self.is_expired(entry, now),
            None => {
                state.metrics.misses += 1;
                return None;
            }
        };

        if expired {
            state.data.remove(key);
            state.access_order.retain(|k| k != key);
            state.metrics.misses += 1;
            state.metrics.expirations += 1;
            return None;
        }

        state.access_order.retain(|k| k != key);
        state.access_order.push_back(key.clone());
        state.metrics.hits += 1;

        state.data.get(key).map(|entry| entry.value.clone())
    }

    /// Insert value into cache (evicts LRU if at capacity)
    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let mut state = self.state.write();

        if state.data.len() >= self.config.capacity && !state.data.contains_key(&key) {
            if let Some(lru_key) = state.access_order.pop_front() {
                state.data.remove(&lru_key);
                state.metrics.evictions += 1;
            }
        }

        state.data.insert(
            key.clone(),
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
        state.access_order.retain(|k| k != &key);
        state.access_order.push_back(key);
        state.metrics.inserts += 1;
    }

    /// Get current metrics
    pub fn metrics(&self) -> CacheMetrics {
        self.state.read().metrics.clone()
    }

    /// Get current cache size (expired entries included until touched)
    pub fn len(&self) -> usize {
        self.state.read().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
