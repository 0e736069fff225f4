/// Error taxonomy for tokenwatch
///
/// Every fallible operation in the detection, market data and storage layers
/// returns [`AnalysisError`]. The webhook path logs and swallows these; the
/// read endpoints turn them into JSON error bodies.
use thiserror::Error;

// =============================================================================
// MAIN ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// Bad caller input (e.g. an empty id set)
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Upstream non-success status, network failure or undecodable body
    #[error("{}", format_provider_error(provider, *status, message))]
    Provider {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    /// No token list was ever fetched and the latest refresh failed
    #[error("Token catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// Persistence read/write failure
    #[error("Storage error during {operation}: {message}")]
    Storage { operation: String, message: String },
}

fn format_provider_error(provider: &str, status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Provider {} returned HTTP {}: {}", provider, code, message),
        None => format!("Provider {} request failed: {}", provider, message),
    }
}

impl AnalysisError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AnalysisError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn provider(provider: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        AnalysisError::Provider {
            provider: provider.to_string(),
            status,
            message: message.into(),
        }
    }

    pub fn storage(operation: &str, message: impl Into<String>) -> Self {
        AnalysisError::Storage {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    /// Upstream HTTP status, when the error came from a provider response
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AnalysisError::Provider { status, .. } => *status,
            _ => None,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let with_status = AnalysisError::provider("CoinMarketCap", Some(429), "rate limited");
        assert_eq!(
            with_status.to_string(),
            "Provider CoinMarketCap returned HTTP 429: rate limited"
        );
        assert_eq!(with_status.upstream_status(), Some(429));

        let network = AnalysisError::provider("CoinMarketCap", None, "connection reset");
        assert_eq!(
            network.to_string(),
            "Provider CoinMarketCap request failed: connection reset"
        );
        assert_eq!(network.upstream_status(), None);
    }

    #[test]
    fn test_storage_error_display() {
        let err = AnalysisError::storage("append", "disk full");
        assert_eq!(err.to_string(), "Storage error during append: disk full");
    }
}
