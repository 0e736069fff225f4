/// Webserver middleware
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Query, Request, State},
    http::{Method, Uri},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    logger::{self, LogTag},
    webserver::{
        history::{sanitize_headers, WebhookCapture},
        state::AppState,
    },
};

pub const WEBHOOK_PATH: &str = "/crypto-analysis";

/// Largest webhook body accepted
pub const MAX_WEBHOOK_BODY_BYTES: usize = 1024 * 1024;

/// Records every `POST /crypto-analysis` into the webhook history, then
/// forwards the request with its body intact. A body that is too large or
/// unreadable is forwarded as empty so the caller still gets a 200.
pub async fn capture_webhook(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::POST || request.uri().path() != WEBHOOK_PATH {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_WEBHOOK_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            logger::warning(
                LogTag::Webhook,
                &format!(
                    "Dropping webhook body (limit {} bytes): {}",
                    MAX_WEBHOOK_BODY_BYTES, e
                ),
            );
            Bytes::new()
        }
    };

    let query = parse_query(&parts.uri);
    let segments = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
    });

    let capture = WebhookCapture {
        timestamp: Utc::now(),
        session_id: query.get("session_id").cloned(),
        uid: query.get("uid").cloned(),
        segments,
        headers: sanitize_headers(
            parts
                .headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_bytes())),
        ),
    };

    logger::debug(
        LogTag::Webhook,
        &format!(
            "Captured webhook (session_id={}, uid={}, {} bytes)",
            capture.session_id.as_deref().unwrap_or("-"),
            capture.uid.as_deref().unwrap_or("-"),
            bytes.len()
        ),
    );
    state.history.record(capture);

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn parse_query(uri: &Uri) -> HashMap<String, String> {
    Query::<HashMap<String, String>>::try_from_uri(uri)
        .map(|Query(params)| params)
        .unwrap_or_default()
}
