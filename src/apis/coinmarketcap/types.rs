/// CoinMarketCap Pro API response types
///
/// Numeric fields are optional throughout: CMC reports `null` for unknown
/// supplies and for quotes on thinly traded assets.
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct CmcEnvelope<T> {
    #[serde(default)]
    pub status: Option<CmcStatus>,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CmcStatus {
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Entry of `/cryptocurrency/listings/latest`
#[derive(Debug, Clone, Deserialize)]
pub struct CmcListing {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub cmc_rank: Option<u32>,
}

/// `data` of `/cryptocurrency/quotes/latest`, keyed by id
pub type CmcQuotesData = HashMap<String, CmcQuote>;

#[derive(Debug, Clone, Deserialize)]
pub struct CmcQuote {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub cmc_rank: Option<u32>,
    #[serde(default)]
    pub num_market_pairs: Option<u64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub max_supply: Option<f64>,
    #[serde(default)]
    pub platform: Option<CmcPlatform>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub quote: HashMap<String, CmcUsdQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CmcPlatform {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub token_address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CmcUsdQuote {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
    #[serde(default)]
    pub volume_change_24h: Option<f64>,
    #[serde(default)]
    pub percent_change_1h: Option<f64>,
    #[serde(default)]
    pub percent_change_24h: Option<f64>,
    #[serde(default)]
    pub percent_change_7d: Option<f64>,
    #[serde(default)]
    pub percent_change_30d: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_dominance: Option<f64>,
    #[serde(default)]
    pub fully_diluted_market_cap: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}
