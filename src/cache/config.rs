/// Cache configuration per entity type
///
/// TTLs and capacities tuned for different use cases:
/// - Token listings: 15 min (payload behind the catalog refresh)
/// - Market quotes: 60s (one entry per requested id set)

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for cached entries
    pub ttl: Duration,

    /// Maximum number of entries (LRU eviction when exceeded)
    pub capacity: usize,
}

impl CacheConfig {
    /// Top-N listings payload (one key in practice)
    pub fn token_listings(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            capacity: 8,
        }
    }

    /// Market quote batches keyed by id set
    pub fn market_quotes(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            capacity: 500,
        }
    }

    /// Custom configuration
    pub fn custom(ttl_secs: u64, capacity: usize) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            capacity,
        }
    }
}
