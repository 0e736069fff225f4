/// Shared application state for the webserver
use crate::analysis::AnalysisPipeline;
use crate::apis::stats::ApiStatsTracker;
use crate::config::WebserverConfig;
use crate::marketdata::MarketDataService;
use crate::storage::AnalysisStore;
use crate::tokens::TokenCatalog;
use crate::webserver::history::WebhookHistory;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<WebserverConfig>,
    pub pipeline: Arc<AnalysisPipeline>,
    pub store: Arc<AnalysisStore>,
    pub catalog: Arc<TokenCatalog>,
    pub market_data: Arc<MarketDataService>,
    pub history: Arc<WebhookHistory>,
    /// Request stats of the market data provider client, when one is wired in
    pub market_data_stats: Option<Arc<ApiStatsTracker>>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        config: WebserverConfig,
        pipeline: Arc<AnalysisPipeline>,
        store: Arc<AnalysisStore>,
        catalog: Arc<TokenCatalog>,
        market_data: Arc<MarketDataService>,
        history: Arc<WebhookHistory>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            pipeline,
            store,
            catalog,
            market_data,
            history,
            market_data_stats: None,
            startup_time: Utc::now(),
        }
    }

    pub fn with_market_data_stats(mut self, stats: Arc<ApiStatsTracker>) -> Self {
        self.market_data_stats = Some(stats);
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.startup_time).num_seconds().max(0) as u64
    }
}
