/// CoinMarketCap Pro API client
///
/// API Documentation: https://coinmarketcap.com/api/documentation/v1/
///
/// Endpoints implemented:
/// 1. /cryptocurrency/listings/latest - top tokens by market cap (catalog)
/// 2. /cryptocurrency/quotes/latest - batch quotes by id (market data)
pub mod types;

use self::types::{CmcEnvelope, CmcListing, CmcQuote, CmcQuotesData};
use crate::apis::client::{HttpClient, RateLimiter};
use crate::apis::stats::{ApiStats, ApiStatsTracker};
use crate::errors::{AnalysisError, AnalysisResult};
use crate::logger::{self, LogTag};
use crate::marketdata::QuoteSource;
use crate::tokens::catalog::ListingsSource;
use crate::tokens::TokenSummary;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;

const PROVIDER: &str = "CoinMarketCap";
const ENDPOINT_LISTINGS: &str = "/cryptocurrency/listings/latest";
const ENDPOINT_QUOTES: &str = "/cryptocurrency/quotes/latest";
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Auxiliary fields requested with every quote lookup
pub const QUOTE_AUX_FIELDS: &str =
    "num_market_pairs,cmc_rank,date_added,tags,platform,max_supply,circulating_supply,total_supply";

pub struct CoinMarketCapClient {
    base_url: String,
    api_key: String,
    http_client: HttpClient,
    rate_limiter: RateLimiter,
    stats: Arc<ApiStatsTracker>,
}

impl CoinMarketCapClient {
    pub fn new(
        base_url: &str,
        api_key: String,
        timeout_secs: u64,
        rate_limit_per_minute: usize,
    ) -> Result<Self, String> {
        if base_url.trim().is_empty() {
            return Err("CoinMarketCap base URL cannot be empty".to_string());
        }
        if api_key.trim().is_empty() {
            logger::warning(
                LogTag::Api,
                "CoinMarketCap API key is empty; requests will be rejected upstream",
            );
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http_client: HttpClient::new(timeout_secs)?,
            rate_limiter: RateLimiter::new(rate_limit_per_minute),
            stats: Arc::new(ApiStatsTracker::new()),
        })
    }

    pub fn get_stats(&self) -> ApiStats {
        self.stats.get_stats()
    }

    /// Shared handle for reporting, e.g. the `/status` endpoint
    pub fn stats_handle(&self) -> Arc<ApiStatsTracker> {
        Arc::clone(&self.stats)
    }

    pub fn listings_url(&self, limit: usize) -> String {
        format!(
            "{}{}?start=1&limit={}&sort=market_cap&sort_dir=desc",
            self.base_url, ENDPOINT_LISTINGS, limit
        )
    }

    pub fn quotes_url(&self, ids: &[i64]) -> String {
        let id_csv = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}{}?id={}&aux={}",
            self.base_url, ENDPOINT_QUOTES, id_csv, QUOTE_AUX_FIELDS
        )
    }

    /// Fetch the top `limit` tokens ordered by market cap, descending
    pub async fn fetch_listings(&self, limit: usize) -> AnalysisResult<Vec<CmcListing>> {
        let listings: Vec<CmcListing> = self.get_json("listings", &self.listings_url(limit)).await?;
        logger::debug(
            LogTag::Api,
            &format!("[CMC] Listings returned {} tokens", listings.len()),
        );
        Ok(listings)
    }

    /// Fetch quotes for a batch of ids in one call
    pub async fn fetch_quotes_latest(&self, ids: &[i64]) -> AnalysisResult<Vec<CmcQuote>> {
        if ids.is_empty() {
            return Err(AnalysisError::invalid_argument("No token ids supplied"));
        }

        let data: CmcQuotesData = self.get_json("quotes", &self.quotes_url(ids)).await?;
        Ok(data.into_values().collect())
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, url: &str) -> AnalysisResult<T> {
        self.rate_limiter.acquire().await;

        let start = Instant::now();
        let result = self.send(url).await;
        let elapsed = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(value) => {
                self.stats.record_request(true, elapsed);
                Ok(value)
            }
            Err(e) => {
                self.stats.record_request(false, elapsed);
                self.stats.record_error(endpoint, e.to_string());
                logger::error(
                    LogTag::Api,
                    &format!("[CMC] {} request failed: {}", endpoint, e),
                );
                Err(e)
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, url: &str) -> AnalysisResult<T> {
        let response = self
            .http_client
            .client()
            .get(url)
            .header("Accept", "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| AnalysisError::provider(PROVIDER, None, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::provider(PROVIDER, Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<CmcEnvelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|env| env.status)
                .and_then(|s| s.error_message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(AnalysisError::provider(
                PROVIDER,
                Some(status.as_u16()),
                message,
            ));
        }

        parse_envelope(&body)
    }
}

/// Decode a CMC envelope, treating a non-zero `status.error_code` as failure
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> AnalysisResult<T> {
    let envelope: CmcEnvelope<T> = serde_json::from_str(body).map_err(|e| {
        AnalysisError::provider(PROVIDER, None, format!("Invalid response body: {}", e))
    })?;

    if let Some(status) = &envelope.status {
        if status.error_code != 0 {
            return Err(AnalysisError::provider(
                PROVIDER,
                None,
                status
                    .error_message
                    .clone()
                    .unwrap_or_else(|| format!("error code {}", status.error_code)),
            ));
        }
    }

    envelope
        .data
        .ok_or_else(|| AnalysisError::provider(PROVIDER, None, "Response has no data"))
}

impl From<CmcListing> for TokenSummary {
    fn from(listing: CmcListing) -> Self {
        TokenSummary {
            id: listing.id,
            name: listing.name,
            symbol: listing.symbol,
            slug: listing.slug,
            rank: listing.cmc_rank,
        }
    }
}

#[async_trait]
impl ListingsSource for CoinMarketCapClient {
    async fn fetch_top_tokens(&self, limit: usize) -> AnalysisResult<Vec<TokenSummary>> {
        let listings = self.fetch_listings(limit).await?;
        Ok(listings.into_iter().map(TokenSummary::from).collect())
    }
}

#[async_trait]
impl QuoteSource for CoinMarketCapClient {
    async fn fetch_quotes(&self, ids: &[i64]) -> AnalysisResult<Vec<CmcQuote>> {
        self.fetch_quotes_latest(ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CoinMarketCapClient {
        CoinMarketCapClient::new("https://pro-api.coinmarketcap.com/v1/", "key".to_string(), 10, 30)
            .unwrap()
    }

    #[test]
    fn test_listings_url() {
        assert_eq!(
            client().listings_url(50),
            "https://pro-api.coinmarketcap.com/v1/cryptocurrency/listings/latest?start=1&limit=50&sort=market_cap&sort_dir=desc"
        );
    }

    #[test]
    fn test_quotes_url_joins_ids() {
        let url = client().quotes_url(&[1, 1027]);
        assert!(url.contains("/cryptocurrency/quotes/latest?id=1,1027&aux="));
        assert!(url.ends_with(QUOTE_AUX_FIELDS));
    }

    #[test]
    fn test_parse_listings_envelope() {
        let body = r#"{
            "status": { "error_code": 0, "error_message": null },
            "data": [
                { "id": 1, "name": "Bitcoin", "symbol": "BTC", "slug": "bitcoin", "cmc_rank": 1, "tags": ["mineable"] },
                { "id": 99, "name": "Fresh", "symbol": "FRSH", "slug": "fresh", "cmc_rank": null }
            ]
        }"#;
        let listings: Vec<CmcListing> = parse_envelope(body).unwrap();
        let tokens: Vec<TokenSummary> = listings.into_iter().map(TokenSummary::from).collect();

        assert_eq!(tokens[0].symbol, "BTC");
        assert_eq!(tokens[0].rank, Some(1));
        assert_eq!(tokens[1].rank, None);
    }

    #[test]
    fn test_parse_envelope_error_code() {
        let body = r#"{ "status": { "error_code": 1001, "error_message": "This API Key is invalid." } }"#;
        let err = parse_envelope::<Vec<CmcListing>>(body).unwrap_err();
        assert!(err.to_string().contains("This API Key is invalid."));
    }

    #[test]
    fn test_parse_quotes_keyed_by_id() {
        let body = r#"{
            "status": { "error_code": 0 },
            "data": {
                "1": {
                    "id": 1, "name": "Bitcoin", "symbol": "BTC", "slug": "bitcoin",
                    "cmc_rank": 1, "max_supply": 21000000, "total_supply": null,
                    "quote": { "USD": { "price": 64000.5, "market_cap": null } }
                }
            }
        }"#;
        let data: CmcQuotesData = parse_envelope(body).unwrap();
        let quote = &data["1"];
        assert_eq!(quote.max_supply, Some(21_000_000.0));
        assert_eq!(quote.total_supply, None);
        assert_eq!(quote.quote["USD"].price, Some(64000.5));
        assert_eq!(quote.quote["USD"].market_cap, None);
    }
}
