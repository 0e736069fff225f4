use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    analysis::WebhookPayload,
    logger::{self, LogTag},
    storage::DEFAULT_PAGE_LIMIT,
    webserver::{
        state::AppState,
        utils::{error_response, parse_or, success_response},
    },
};

#[derive(Debug, Deserialize)]
pub struct WebhookQuery {
    pub session_id: Option<String>,
    pub uid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalysesQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/crypto-analysis", post(crypto_analysis))
        .route("/analyses", get(list_analyses))
        .route("/analyses/:token_id", get(analysis_for_token))
}

/// POST /crypto-analysis
///
/// Always answers 200; the body is empty unless an analysis completed.
async fn crypto_analysis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WebhookQuery>,
    body: Bytes,
) -> Response {
    logger::debug(
        LogTag::Webhook,
        &format!(
            "Webhook received (session_id={}, uid={})",
            query.session_id.as_deref().unwrap_or("-"),
            query.uid.as_deref().unwrap_or("-")
        ),
    );

    let payload = WebhookPayload::from_body(&body);
    let outcome = state.pipeline.process(&payload).await;

    match outcome.response() {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

/// GET /analyses?limit=&offset=
async fn list_analyses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalysesQuery>,
) -> Response {
    let limit = parse_or(query.limit.as_deref(), DEFAULT_PAGE_LIMIT);
    let offset = parse_or(query.offset.as_deref(), 0);
    logger::debug(
        LogTag::Webserver,
        &format!("Fetching analyses (limit={}, offset={})", limit, offset),
    );

    match state.store.get_analyses(limit, offset).await {
        Ok(page) => success_response(page),
        Err(e) => {
            logger::error(
                LogTag::Storage,
                &format!("Error fetching analyses: {}", e),
            );
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch analyses",
                e.to_string(),
            )
        }
    }
}

/// GET /analyses/:token_id
async fn analysis_for_token(
    State(state): State<Arc<AppState>>,
    Path(token_id): Path<String>,
) -> Response {
    let not_found = || {
        error_response(
            StatusCode::NOT_FOUND,
            "Analysis not found",
            format!("No analysis found for token {}", token_id),
        )
    };

    let Ok(coin_id) = token_id.trim().parse::<i64>() else {
        return not_found();
    };

    match state.store.get_latest_for_token(coin_id).await {
        Ok(Some(record)) => success_response(record),
        Ok(None) => not_found(),
        Err(e) => {
            logger::error(
                LogTag::Storage,
                &format!("Error fetching analysis for token {}: {}", coin_id, e),
            );
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch analysis",
                e.to_string(),
            )
        }
    }
}
