/// Base HTTP client with rate limiting
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces outbound request starts so a client never exceeds its per-minute
/// budget. Requests themselves may overlap; only their start times are paced.
pub struct RateLimiter {
    next_slot: Mutex<Option<Instant>>,
    min_interval: Duration,
    max_per_minute: usize,
}

impl RateLimiter {
    pub fn new(max_per_minute: usize) -> Self {
        let min_interval = if max_per_minute > 0 {
            Duration::from_secs_f64(60.0 / max_per_minute as f64)
        } else {
            Duration::ZERO
        };

        Self {
            next_slot: Mutex::new(None),
            min_interval,
            max_per_minute,
        }
    }

    /// Wait until the next request slot is available
    pub async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let wait_until = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next_slot {
                Some(slot) if slot > now => slot,
                _ => now,
            };
            *next_slot = Some(slot + self.min_interval);
            slot
        };

        tokio::time::sleep_until(wait_until).await;
    }

    pub fn max_per_minute(&self) -> usize {
        self.max_per_minute
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// HTTP client wrapper with a fixed per-request timeout
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self, String> {
        if timeout_secs == 0 {
            return Err("Timeout must be greater than zero".to_string());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("tokenwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
