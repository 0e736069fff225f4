use axum::{extract::State, response::Response, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::{
    apis::stats::ApiStats,
    cache::CacheMetrics,
    logger::{self, LogTag},
    tokens::catalog::CatalogSummary,
    webserver::{history::WebhookCapture, state::AppState, utils::success_response},
};

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub uptime_seconds: u64,
    pub catalog: Option<CatalogSummary>,
    pub caches: CacheStatus,
    pub providers: ProviderStatus,
    pub webhooks_captured: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub listings: CacheMetrics,
    pub quotes: CacheMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub market_data: Option<ApiStats>,
    pub ai: Option<AiProviderStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiProviderStatus {
    pub provider: String,
    pub rate_limit_per_minute: usize,
    pub stats: ApiStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookHistoryResponse {
    pub webhooks: Vec<WebhookCapture>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(system_status))
        .route(
            "/debug/webhooks",
            get(webhook_history).delete(clear_webhook_history),
        )
}

/// GET /health
async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    logger::debug(LogTag::Webserver, "Health check endpoint called");

    success_response(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        environment: state.config.environment.clone(),
    })
}

/// GET /status
async fn system_status(State(state): State<Arc<AppState>>) -> Response {
    let ai = state.pipeline.summarizer().map(|client| AiProviderStatus {
        provider: client.provider().to_string(),
        rate_limit_per_minute: client.rate_limit_info().0,
        stats: client.get_stats(),
    });

    success_response(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        catalog: state.catalog.current().map(|snapshot| snapshot.summary()),
        caches: CacheStatus {
            listings: state.catalog.cache_metrics(),
            quotes: state.market_data.cache_metrics(),
        },
        providers: ProviderStatus {
            market_data: state.market_data_stats.as_ref().map(|s| s.get_stats()),
            ai,
        },
        webhooks_captured: state.history.len(),
    })
}

/// GET /debug/webhooks
async fn webhook_history(State(state): State<Arc<AppState>>) -> Response {
    success_response(WebhookHistoryResponse {
        webhooks: state.history.snapshot(),
    })
}

/// DELETE /debug/webhooks
async fn clear_webhook_history(State(state): State<Arc<AppState>>) -> Response {
    let cleared = state.history.clear();
    logger::info(
        LogTag::Webhook,
        &format!("Cleared {} captured webhook(s)", cleared),
    );
    success_response(json!({ "cleared": cleared }))
}
