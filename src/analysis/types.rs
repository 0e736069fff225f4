/// Analysis records, webhook payloads and webhook responses
use crate::marketdata::MarketQuote;
use crate::tokens::TokenSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted result of one completed webhook analysis. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub coin_id: i64,
    pub name: String,
    pub symbol: String,
    pub market_data: MarketDataSummary,
    pub detection_context: DetectionContext,
    pub ai_analysis: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketDataSummary {
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub volume_change_24h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_7d: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub market_cap_dominance: Option<f64>,
}

impl From<&MarketQuote> for MarketDataSummary {
    fn from(quote: &MarketQuote) -> Self {
        let usd = quote.usd();
        Self {
            current_price: usd.price,
            market_cap: usd.market_cap,
            volume_24h: usd.volume_24h,
            volume_change_24h: usd.volume_change_24h,
            price_change_24h: usd.percent_change_24h,
            price_change_7d: usd.percent_change_7d,
            market_cap_rank: quote.cmc_rank,
            market_cap_dominance: usd.market_cap_dominance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionContext {
    pub original_text: String,
    pub matched_term: String,
    pub confidence: String,
}

impl DetectionContext {
    pub fn new(original_text: &str, token: &TokenSummary) -> Self {
        Self {
            original_text: original_text.to_string(),
            matched_term: token.name.clone(),
            confidence: "high".to_string(),
        }
    }
}

/// One transcript segment; only `text` is read, other fields are kept for
/// the webhook history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Webhook body: either a bare segment array or `{ "segments": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    Segments(Vec<Segment>),
    Wrapped {
        #[serde(default)]
        segments: Vec<Segment>,
    },
}

impl WebhookPayload {
    /// Parse a raw body; anything malformed is treated as carrying no segments
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or(WebhookPayload::Segments(Vec::new()))
    }

    pub fn segments(&self) -> &[Segment] {
        match self {
            WebhookPayload::Segments(segments) => segments,
            WebhookPayload::Wrapped { segments } => segments,
        }
    }

    /// All segment texts joined with single spaces
    pub fn full_text(&self) -> String {
        self.segments()
            .iter()
            .filter_map(|s| s.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Body returned when an analysis completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: String,
    pub message: String,
    pub app_response: Vec<AppResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppResponse {
    pub app_id: String,
    pub content: AppContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppContent {
    pub token: String,
    pub analysis: String,
}

impl WebhookResponse {
    pub fn success(app_id: &str, record: &AnalysisRecord) -> Self {
        Self {
            status: "success".to_string(),
            message: format!("Analysis for {}", record.name),
            app_response: vec![AppResponse {
                app_id: app_id.to_string(),
                content: AppContent {
                    token: format!("{} ({})", record.name, record.symbol),
                    analysis: record.ai_analysis.clone().unwrap_or_default(),
                },
            }],
        }
    }
}
