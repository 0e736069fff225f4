/// Market data fetcher with a short-TTL cache keyed by id set
use crate::apis::coinmarketcap::types::CmcQuote;
use crate::cache::{CacheConfig, CacheManager, CacheMetrics};
use crate::clock::{Clock, SystemClock};
use crate::errors::{AnalysisError, AnalysisResult};
use crate::logger::{self, LogTag};
use crate::marketdata::types::MarketQuote;
use async_trait::async_trait;
use std::sync::Arc;

/// Upstream of the fetcher: one batch call for a set of ids
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quotes(&self, ids: &[i64]) -> AnalysisResult<Vec<CmcQuote>>;
}

pub struct MarketDataService {
    source: Arc<dyn QuoteSource>,
    cache: CacheManager<String, Arc<Vec<MarketQuote>>>,
}

impl MarketDataService {
    pub fn new(source: Arc<dyn QuoteSource>, ttl_secs: u64) -> Self {
        Self::with_clock(source, ttl_secs, Arc::new(SystemClock))
    }

    pub fn with_clock(source: Arc<dyn QuoteSource>, ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            cache: CacheManager::with_clock(CacheConfig::market_quotes(ttl_secs), clock),
        }
    }

    /// Quotes for `ids`, ordered by ascending id. A cached batch for the same
    /// id set is returned verbatim while fresh.
    pub async fn get_market_data(&self, ids: &[i64]) -> AnalysisResult<Vec<MarketQuote>> {
        let (key, ids) = cache_key(ids)
            .ok_or_else(|| AnalysisError::invalid_argument("At least one token id is required"))?;

        if let Some(cached) = self.cache.get(&key) {
            logger::debug(
                LogTag::MarketData,
                &format!("Quote cache hit for [{}]", key),
            );
            return Ok(cached.as_ref().clone());
        }

        let raw = self.source.fetch_quotes(&ids).await.map_err(|e| {
            logger::error(
                LogTag::MarketData,
                &format!("Quote fetch failed for [{}]: {}", key, e),
            );
            e
        })?;

        let mut quotes: Vec<MarketQuote> = raw.into_iter().map(MarketQuote::from).collect();
        quotes.sort_by_key(|q| q.id);

        logger::debug(
            LogTag::MarketData,
            &format!("Fetched {} quote(s) for [{}]", quotes.len(), key),
        );
        self.cache.insert(key, Arc::new(quotes.clone()));
        Ok(quotes)
    }

    pub fn cache_metrics(&self) -> CacheMetrics {
        self.cache.metrics()
    }
}

/// Sorted, deduplicated, comma-joined id set plus the ids themselves.
/// `None` when `ids` is empty.
pub fn cache_key(ids: &[i64]) -> Option<(String, Vec<i64>)> {
    if ids.is_empty() {
        return None;
    }

    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    let key = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    Some((key, ids))
}
