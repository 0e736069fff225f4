/// Per-client request statistics, surfaced by `/status`
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_latency_ms: f64,
    pub last_request_at: Option<DateTime<Utc>>,
    pub last_error: Option<ApiErrorEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorEvent {
    pub endpoint: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct ApiStatsTracker {
    stats: RwLock<ApiStats>,
}

impl ApiStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self, success: bool, latency_ms: f64) {
        let mut stats = self.stats.write();
        let previous_total = stats.total_requests as f64;
        stats.total_requests += 1;
        if success {
            stats.successful_requests += 1;
        } else {
            stats.failed_requests += 1;
        }
        stats.average_latency_ms =
            (stats.average_latency_ms * previous_total + latency_ms) / stats.total_requests as f64;
        stats.last_request_at = Some(Utc::now());
    }

    pub fn record_error(&self, endpoint: &str, message: impl Into<String>) {
        self.stats.write().last_error = Some(ApiErrorEvent {
            endpoint: endpoint.to_string(),
            message: message.into(),
            at: Utc::now(),
        });
    }

    pub fn get_stats(&self) -> ApiStats {
        self.stats.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_running_average() {
        let tracker = ApiStatsTracker::new();
        tracker.record_request(true, 100.0);
        tracker.record_request(false, 300.0);
        tracker.record_error("quotes", "HTTP 500");

        let stats = tracker.get_stats();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.successful_requests, 1);
        assert_eq!(stats.failed_requests, 1);
        assert_eq!(stats.average_latency_ms, 200.0);
        assert_eq!(stats.last_error.unwrap().endpoint, "quotes");
    }
}
