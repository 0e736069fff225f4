// Configuration schema for every tokenwatch subsystem

use crate::config_struct;

// ============================================================================
// WEBSERVER
// ============================================================================

config_struct! {
    /// HTTP listener and webhook response settings
    pub struct WebserverConfig {
        /// Host/IP address to bind (0.0.0.0 for all interfaces)
        host: String = "0.0.0.0".to_string(),

        /// Port to bind the webserver
        port: u16 = 3000,

        /// Environment label reported by /health
        environment: String = "development".to_string(),

        /// `app_id` attached to webhook responses
        app_id: String = "poyo".to_string(),
    }
}

// ============================================================================
// MARKET DATA PROVIDER
// ============================================================================

config_struct! {
    /// CoinMarketCap-compatible market data provider
    pub struct MarketDataConfig {
        base_url: String = "https://pro-api.coinmarketcap.com/v1".to_string(),

        /// API key sent as X-CMC_PRO_API_KEY (CMC_API_KEY env overrides)
        api_key: String = String::new(),

        /// Per-request timeout
        timeout_secs: u64 = 10,

        /// Outbound request budget shared by listings and quotes
        rate_limit_per_minute: usize = 30,

        /// Number of tokens (by market cap) in the detection catalog
        top_tokens_limit: usize = 50,

        /// Catalog snapshot staleness interval
        catalog_refresh_secs: u64 = 900,

        /// TTL of the cached listings payload in front of the network call
        listings_cache_secs: u64 = 900,

        /// TTL of cached quote batches
        quotes_cache_secs: u64 = 60,
    }
}

// ============================================================================
// AI SUMMARIZER
// ============================================================================

config_struct! {
    /// Optional chat-completion summarizer; disabled while api_key is empty
    pub struct AiConfig {
        /// "redpill" or "openai" (selects the default base URL)
        provider: String = "redpill".to_string(),

        /// Overrides the provider's default base URL when non-empty
        base_url: String = String::new(),

        /// Bearer token (REDPILL_API_KEY env overrides)
        api_key: String = String::new(),

        model: String = "claude-3-5-sonnet-20241022".to_string(),

        temperature: f32 = 1.0,

        timeout_secs: u64 = 10,
    }
}

impl AiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// ============================================================================
// STORAGE
// ============================================================================

config_struct! {
    /// Analysis persistence
    pub struct StorageConfig {
        /// Oldest records are dropped beyond this count
        max_records: usize = 1000,

        /// File name inside the data directory
        file_name: String = "analyses.json".to_string(),
    }
}

// ============================================================================
// WEBHOOK
// ============================================================================

config_struct! {
    /// Inbound webhook capture
    pub struct WebhookConfig {
        /// Number of recent payloads kept for /debug/webhooks
        history_size: usize = 50,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration structure containing all sub-configurations
    pub struct Config {
        webserver: WebserverConfig = WebserverConfig::default(),
        market_data: MarketDataConfig = MarketDataConfig::default(),
        ai: AiConfig = AiConfig::default(),
        storage: StorageConfig = StorageConfig::default(),
        webhook: WebhookConfig = WebhookConfig::default(),
    }
}
