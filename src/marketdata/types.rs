/// Normalized market quote served to the analysis pipeline
///
/// Built from the provider record by explicit projection: unknown fields are
/// dropped and missing numbers stay `None` rather than becoming zero.
use crate::apis::coinmarketcap::types::{CmcPlatform, CmcQuote, CmcUsdQuote};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub id: i64,
    pub name: String,
    pub symbol: String,
    pub slug: String,
    pub cmc_rank: Option<u32>,
    pub num_market_pairs: Option<u64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub platform: Option<Platform>,
    pub quote: QuoteCurrencies,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: i64,
    pub name: String,
    pub symbol: String,
    pub slug: String,
    pub token_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteCurrencies {
    #[serde(rename = "USD")]
    pub usd: UsdQuote,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsdQuote {
    pub price: Option<f64>,
    pub volume_24h: Option<f64>,
    pub volume_change_24h: Option<f64>,
    pub percent_change_1h: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub percent_change_7d: Option<f64>,
    pub percent_change_30d: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_dominance: Option<f64>,
    pub fully_diluted_market_cap: Option<f64>,
    pub last_updated: Option<String>,
}

impl MarketQuote {
    pub fn usd(&self) -> &UsdQuote {
        &self.quote.usd
    }
}

impl From<CmcPlatform> for Platform {
    fn from(p: CmcPlatform) -> Self {
        Self {
            id: p.id,
            name: p.name,
            symbol: p.symbol,
            slug: p.slug,
            token_address: p.token_address,
        }
    }
}

impl From<CmcUsdQuote> for UsdQuote {
    fn from(q: CmcUsdQuote) -> Self {
        Self {
            price: q.price,
            volume_24h: q.volume_24h,
            volume_change_24h: q.volume_change_24h,
            percent_change_1h: q.percent_change_1h,
            percent_change_24h: q.percent_change_24h,
            percent_change_7d: q.percent_change_7d,
            percent_change_30d: q.percent_change_30d,
            market_cap: q.market_cap,
            market_cap_dominance: q.market_cap_dominance,
            fully_diluted_market_cap: q.fully_diluted_market_cap,
            last_updated: q.last_updated,
        }
    }
}

impl From<CmcQuote> for MarketQuote {
    fn from(mut raw: CmcQuote) -> Self {
        let usd = raw.quote.remove("USD").map(UsdQuote::from).unwrap_or_default();

        Self {
            id: raw.id,
            name: raw.name,
            symbol: raw.symbol,
            slug: raw.slug,
            cmc_rank: raw.cmc_rank,
            num_market_pairs: raw.num_market_pairs,
            circulating_supply: raw.circulating_supply,
            total_supply: raw.total_supply,
            max_supply: raw.max_supply,
            platform: raw.platform.map(Platform::from),
            quote: QuoteCurrencies { usd },
            last_updated: raw.last_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_keeps_missing_numbers_unset() {
        let raw: CmcQuote = serde_json::from_value(serde_json::json!({
            "id": 1027,
            "name": "Ethereum",
            "symbol": "ETH",
            "slug": "ethereum",
            "tags": ["pos"],
            "date_added": "2015-08-07T00:00:00.000Z",
            "max_supply": null,
            "quote": {
                "USD": { "price": 3100.25, "volume_24h": null, "tvl": 12 },
                "EUR": { "price": 2900.0 }
            }
        }))
        .unwrap();

        let quote = MarketQuote::from(raw);
        assert_eq!(quote.usd().price, Some(3100.25));
        assert_eq!(quote.usd().volume_24h, None);
        assert_eq!(quote.usd().market_cap, None);
        assert_eq!(quote.max_supply, None);

        let json = serde_json::to_value(&quote).unwrap();
        assert!(json.get("tags").is_none());
        assert!(json["quote"].get("EUR").is_none());
        assert_eq!(json["quote"]["USD"]["price"], 3100.25);
        assert!(json["quote"]["USD"]["volume_24h"].is_null());
    }

    #[test]
    fn test_missing_usd_quote_defaults_to_empty() {
        let raw: CmcQuote = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Bitcoin", "symbol": "BTC", "slug": "bitcoin"
        }))
        .unwrap();
        assert_eq!(MarketQuote::from(raw).quote, QuoteCurrencies::default());
    }
}
