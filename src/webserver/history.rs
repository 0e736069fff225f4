/// Ring buffer of recent inbound webhook payloads, newest first
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

/// Header values replaced before a capture is stored
const REDACTED_HEADERS: &[&str] = &["authorization", "cookie", "proxy-authorization", "x-api-key"];

#[derive(Debug, Clone, Serialize)]
pub struct WebhookCapture {
    pub timestamp: DateTime<Utc>,
    pub session_id: Option<String>,
    pub uid: Option<String>,
    /// Parsed body, or the raw text when it was not valid JSON
    pub segments: serde_json::Value,
    pub headers: BTreeMap<String, String>,
}

pub struct WebhookHistory {
    capacity: usize,
    entries: Mutex<VecDeque<WebhookCapture>>,
}

impl WebhookHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn record(&self, capture: WebhookCapture) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock();
        entries.push_front(capture);
        entries.truncate(self.capacity);
    }

    /// Captures, newest first
    pub fn snapshot(&self) -> Vec<WebhookCapture> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every capture, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.lock();
        let count = entries.len();
        entries.clear();
        count
    }
}

/// Lowercased header map with credential headers redacted
pub fn sanitize_headers<'a, I>(headers: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    headers
        .into_iter()
        .map(|(name, value)| {
            let name = name.to_lowercase();
            let value = if REDACTED_HEADERS.contains(&name.as_str()) {
                "[redacted]".to_string()
            } else {
                String::from_utf8_lossy(value).into_owned()
            };
            (name, value)
        })
        .collect()
}
