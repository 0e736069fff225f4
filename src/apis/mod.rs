/// External API clients
///
/// Each client owns its HTTP client, rate limiter and stats tracker.
pub mod client;
pub mod coinmarketcap;
pub mod llm;
pub mod stats;

pub use self::client::{HttpClient, RateLimiter};
pub use self::coinmarketcap::CoinMarketCapClient;
pub use self::llm::openai_compat::OpenAiCompatClient;
pub use self::llm::{LlmClient, Provider};
pub use self::stats::{ApiStats, ApiStatsTracker};
