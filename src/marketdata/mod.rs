/// Market data fetching and normalization
pub mod service;
pub mod types;

pub use self::service::{MarketDataService, QuoteSource};
pub use self::types::{MarketQuote, UsdQuote};
