/// In-memory TTL caches used in front of provider calls
pub mod config;
pub mod manager;

pub use config::CacheConfig;
pub use manager::{CacheManager, CacheMetrics};
