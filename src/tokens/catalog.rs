/// Token catalog cache
///
/// Holds the current top-N snapshot (tokens, alias index, compiled matcher)
/// behind an `Arc` swap. Snapshots are rebuilt when older than the refresh
/// interval; the listings payload itself sits in a TTL cache so refreshes
/// inside that window reuse it instead of calling the provider.
use crate::cache::{CacheConfig, CacheManager, CacheMetrics};
use crate::clock::Clock;
use crate::config::MarketDataConfig;
use crate::errors::{AnalysisError, AnalysisResult};
use crate::logger::{self, LogTag};
use crate::tokens::aliases::AliasIndex;
use crate::tokens::matcher::MentionMatcher;
use crate::tokens::types::{rank_order, TokenSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Upstream of the catalog: returns the top tokens by market cap, descending
#[async_trait]
pub trait ListingsSource: Send + Sync {
    async fn fetch_top_tokens(&self, limit: usize) -> AnalysisResult<Vec<TokenSummary>>;
}

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub top_tokens_limit: usize,
    pub refresh_interval: Duration,
    pub listings_cache_ttl: Duration,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            top_tokens_limit: 50,
            refresh_interval: Duration::from_secs(15 * 60),
            listings_cache_ttl: Duration::from_secs(15 * 60),
        }
    }
}

impl From<&MarketDataConfig> for CatalogSettings {
    fn from(config: &MarketDataConfig) -> Self {
        Self {
            top_tokens_limit: config.top_tokens_limit,
            refresh_interval: Duration::from_secs(config.catalog_refresh_secs),
            listings_cache_ttl: Duration::from_secs(config.listings_cache_secs),
        }
    }
}

/// Immutable view of one refresh cycle
#[derive(Debug)]
pub struct CatalogSnapshot {
    tokens: Vec<Arc<TokenSummary>>,
    aliases: AliasIndex,
    matcher: MentionMatcher,
    fetched_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn build(mut tokens: Vec<TokenSummary>, fetched_at: DateTime<Utc>) -> AnalysisResult<Self> {
        tokens.sort_by(rank_order);
        let mut seen = HashSet::new();
        tokens.retain(|t| seen.insert(t.id));
        let tokens: Vec<Arc<TokenSummary>> = tokens.into_iter().map(Arc::new).collect();

        let aliases = AliasIndex::build(&tokens);
        let matcher = MentionMatcher::build(aliases.keys()).map_err(|e| {
            AnalysisError::CatalogUnavailable {
                reason: format!("Failed to compile alias matcher: {}", e),
            }
        })?;

        Ok(Self {
            tokens,
            aliases,
            matcher,
            fetched_at,
        })
    }

    /// Tokens in rank order
    pub fn tokens(&self) -> &[Arc<TokenSummary>] {
        &self.tokens
    }

    pub fn aliases(&self) -> &AliasIndex {
        &self.aliases
    }

    pub fn matcher(&self) -> &MentionMatcher {
        &self.matcher
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            token_count: self.tokens.len(),
            alias_count: self.aliases.len(),
            alias_collisions: self.aliases.collisions(),
            fetched_at: self.fetched_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub token_count: usize,
    pub alias_count: usize,
    pub alias_collisions: usize,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct ListingsPayload {
    tokens: Arc<Vec<TokenSummary>>,
    fetched_at: DateTime<Utc>,
}

pub struct TokenCatalog {
    source: Arc<dyn ListingsSource>,
    clock: Arc<dyn Clock>,
    settings: CatalogSettings,
    payload_cache: CacheManager<usize, ListingsPayload>,
    snapshot: RwLock<Option<Arc<CatalogSnapshot>>>,
}

impl TokenCatalog {
    pub fn new(
        source: Arc<dyn ListingsSource>,
        clock: Arc<dyn Clock>,
        settings: CatalogSettings,
    ) -> Self {
        let payload_cache = CacheManager::with_clock(
            CacheConfig::token_listings(settings.listings_cache_ttl.as_secs()),
            Arc::clone(&clock),
        );

        Self {
            source,
            clock,
            settings,
            payload_cache,
            snapshot: RwLock::new(None),
        }
    }

    /// Installed snapshot, without refreshing
    pub fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.snapshot.read().clone()
    }

    /// Current snapshot, refreshed first when absent or stale
    pub async fn get_catalog(&self) -> AnalysisResult<Arc<CatalogSnapshot>> {
        if let Some(snapshot) = self.current() {
            if !self.is_stale(&snapshot) {
                return Ok(snapshot);
            }
        }

        self.refresh().await
    }

    /// Rebuild the snapshot. On failure the previous snapshot is kept and
    /// returned; with no previous snapshot the catalog is unavailable.
    pub async fn refresh(&self) -> AnalysisResult<Arc<CatalogSnapshot>> {
        match self.rebuild().await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => match self.current() {
                Some(previous) => {
                    logger::warning(
                        LogTag::Catalog,
                        &format!(
                            "Catalog refresh failed, keeping snapshot from {}: {}",
                            previous.fetched_at().format("%Y-%m-%d %H:%M:%S"),
                            e
                        ),
                    );
                    Ok(previous)
                }
                None => {
                    logger::error(
                        LogTag::Catalog,
                        &format!("Catalog refresh failed with no snapshot available: {}", e),
                    );
                    Err(match e {
                        AnalysisError::CatalogUnavailable { .. } => e,
                        other => AnalysisError::CatalogUnavailable {
                            reason: other.to_string(),
                        },
                    })
                }
            },
        }
    }

    pub fn cache_metrics(&self) -> CacheMetrics {
        self.payload_cache.metrics()
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    fn is_stale(&self, snapshot: &CatalogSnapshot) -> bool {
        let age = self.clock.now() - snapshot.fetched_at();
        match age.to_std() {
            Ok(age) => age >= self.settings.refresh_interval,
            // fetched_at in the future (clock moved backwards): treat as fresh
            Err(_) => false,
        }
    }

    async fn load_payload(&self) -> AnalysisResult<ListingsPayload> {
        let limit = self.settings.top_tokens_limit;
        if let Some(payload) = self.payload_cache.get(&limit) {
            logger::debug(LogTag::Catalog, "Using cached listings payload");
            return Ok(payload);
        }

        let tokens = self.source.fetch_top_tokens(limit).await?;
        let payload = ListingsPayload {
            tokens: Arc::new(tokens),
            fetched_at: self.clock.now(),
        };
        self.payload_cache.insert(limit, payload.clone());
        Ok(payload)
    }

    async fn rebuild(&self) -> AnalysisResult<Arc<CatalogSnapshot>> {
        let payload = self.load_payload().await?;
        if payload.tokens.is_empty() {
            return Err(AnalysisError::CatalogUnavailable {
                reason: "Listings returned no tokens".to_string(),
            });
        }

        let snapshot = Arc::new(CatalogSnapshot::build(
            payload.tokens.as_ref().clone(),
            payload.fetched_at,
        )?);
        *self.snapshot.write() = Some(Arc::clone(&snapshot));

        logger::info(
            LogTag::Catalog,
            &format!(
                "Catalog refreshed: {} tokens, {} alias keys",
                snapshot.tokens().len(),
                snapshot.aliases().len()
            ),
        );
        Ok(snapshot)
    }
}

/// Warm the catalog once, then refresh it every interval until `shutdown`
/// holds `true`. A stop requested mid-fetch cancels the fetch.
pub fn spawn_refresh_task(
    catalog: Arc<TokenCatalog>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown.wait_for(|stop| *stop) => {
                logger::info(LogTag::Catalog, "Catalog refresh task stopping");
                return;
            }
            warm = catalog.get_catalog() => {
                if let Err(e) = warm {
                    logger::warning(
                        LogTag::Catalog,
                        &format!("Initial catalog warm-up failed: {}", e),
                    );
                }
            }
        }

        let interval = catalog.settings().refresh_interval;
        loop {
            tokio::select! {
                _ = shutdown.wait_for(|stop| *stop) => {
                    logger::info(LogTag::Catalog, "Catalog refresh task stopping");
                    break;
                }
                _ = async {
                    tokio::time::sleep(interval).await;
                    let _ = catalog.refresh().await;
                } => {}
            }
        }
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Listings source backed by a fixed token list
    pub struct FakeListings {
        pub tokens: Vec<TokenSummary>,
        pub calls: AtomicUsize,
        pub fail: AtomicBool,
        pub delay: Duration,
    }

    impl FakeListings {
        pub fn new(tokens: Vec<TokenSummary>) -> Self {
            Self {
                tokens,
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                delay: Duration::ZERO,
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ListingsSource for FakeListings {
        async fn fetch_top_tokens(&self, limit: usize) -> AnalysisResult<Vec<TokenSummary>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(AnalysisError::provider("fake", Some(500), "boom"));
            }
            Ok(self.tokens.iter().take(limit).cloned().collect())
        }
    }

    pub fn sample_tokens() -> Vec<TokenSummary> {
        vec![
            TokenSummary::new(1, "Bitcoin", "BTC", "bitcoin", Some(1)),
            TokenSummary::new(1027, "Ethereum", "ETH", "ethereum", Some(2)),
            TokenSummary::new(5426, "Solana", "SOL", "solana", Some(5)),
            TokenSummary::new(74, "Dogecoin", "DOGE", "dogecoin", Some(8)),
            TokenSummary::new(5994, "Shiba Inu", "SHIB", "shiba-inu", Some(12)),
            TokenSummary::new(99999, "Fresh Coin", "FRSH", "fresh-coin", None),
        ]
    }

    fn settings() -> CatalogSettings {
        CatalogSettings {
            top_tokens_limit: 50,
            refresh_interval: Duration::from_secs(900),
            listings_cache_ttl: Duration::from_secs(900),
        }
    }

    fn catalog_with(source: Arc<FakeListings>, clock: Arc<ManualClock>) -> TokenCatalog {
        TokenCatalog::new(source, clock, settings())
    }

    #[tokio::test]
    async fn test_get_catalog_builds_once_while_fresh() {
        let source = Arc::new(FakeListings::new(sample_tokens()));
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let catalog = catalog_with(source.clone(), clock.clone());

        assert!(catalog.current().is_none());
        let first = catalog.get_catalog().await.unwrap();
        clock.advance(chrono::Duration::seconds(899));
        let second = catalog.get_catalog().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls(), 1);
        assert_eq!(first.tokens()[0].symbol, "BTC");
        assert_eq!(first.tokens().last().unwrap().symbol, "FRSH");
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_rebuilt() {
        let source = Arc::new(FakeListings::new(sample_tokens()));
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let catalog = catalog_with(source.clone(), clock.clone());

        let first = catalog.get_catalog().await.unwrap();
        clock.advance(chrono::Duration::seconds(900));
        let second = catalog.get_catalog().await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls(), 2);
        assert!(second.fetched_at() > first.fetched_at());
    }

    #[tokio::test]
    async fn test_forced_refresh_reuses_cached_payload() {
        let source = Arc::new(FakeListings::new(sample_tokens()));
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let catalog = catalog_with(source.clone(), clock.clone());

        catalog.get_catalog().await.unwrap();
        clock.advance(chrono::Duration::seconds(60));
        let refreshed = catalog.refresh().await.unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(refreshed.tokens().len(), 6);
        assert_eq!(catalog.cache_metrics().hits, 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_snapshot() {
        let source = Arc::new(FakeListings::new(sample_tokens()));
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let catalog = catalog_with(source.clone(), clock.clone());

        let good = catalog.get_catalog().await.unwrap();
        source.fail.store(true, Ordering::SeqCst);
        clock.advance(chrono::Duration::seconds(1800));

        let after = catalog.get_catalog().await.unwrap();
        assert!(Arc::ptr_eq(&good, &after));
        assert!(Arc::ptr_eq(&good, &catalog.current().unwrap()));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_without_snapshot_is_unavailable() {
        let source = Arc::new(FakeListings::new(sample_tokens()));
        source.fail.store(true, Ordering::SeqCst);
        let catalog = catalog_with(source, Arc::new(ManualClock::new(Utc::now())));

        let err = catalog.get_catalog().await.unwrap_err();
        assert!(matches!(err, AnalysisError::CatalogUnavailable { .. }));
        assert!(catalog.current().is_none());
    }

    #[tokio::test]
    async fn test_empty_listings_is_unavailable() {
        let source = Arc::new(FakeListings::new(Vec::new()));
        let catalog = catalog_with(source, Arc::new(ManualClock::new(Utc::now())));

        assert!(matches!(
            catalog.refresh().await,
            Err(AnalysisError::CatalogUnavailable { .. })
        ));
    }

    #[test]
    fn test_snapshot_summary() {
        let snapshot = CatalogSnapshot::build(sample_tokens(), Utc::now()).unwrap();
        let summary = snapshot.summary();
        assert_eq!(summary.token_count, 6);
        assert!(summary.alias_count >= 6 * 4);
        assert_eq!(summary.alias_collisions, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_task_stops_when_flag_already_set() {
        let source = Arc::new(FakeListings::new(sample_tokens()));
        let catalog = Arc::new(catalog_with(source, Arc::new(ManualClock::new(Utc::now()))));
        let (tx, rx) = watch::channel(false);
        tx.send_replace(true);

        let task = spawn_refresh_task(catalog, rx);
        assert!(tokio::time::timeout(Duration::from_secs(5), task).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_task_stops_during_warm_up() {
        let mut slow = FakeListings::new(sample_tokens());
        slow.delay = Duration::from_secs(60);
        let source = Arc::new(slow);
        let catalog = Arc::new(catalog_with(
            source.clone(),
            Arc::new(ManualClock::new(Utc::now())),
        ));
        let (tx, rx) = watch::channel(false);

        let task = spawn_refresh_task(catalog.clone(), rx);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 1);

        tx.send_replace(true);
        assert!(tokio::time::timeout(Duration::from_secs(5), task).await.is_ok());
        assert!(catalog.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_task_stops_between_refreshes() {
        let source = Arc::new(FakeListings::new(sample_tokens()));
        let catalog = Arc::new(catalog_with(
            source.clone(),
            Arc::new(ManualClock::new(Utc::now())),
        ));
        let (tx, rx) = watch::channel(false);

        let task = spawn_refresh_task(catalog.clone(), rx);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(catalog.current().is_some());

        tx.send_replace(true);
        assert!(tokio::time::timeout(Duration::from_secs(5), task).await.is_ok());
        assert_eq!(source.calls(), 1);
    }
}
