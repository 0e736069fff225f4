/// LLM client layer
///
/// The analysis pipeline talks to a summarizer through [`LlmClient`]; the only
/// wire format implemented is the OpenAI-compatible chat completions API,
/// which both RedPill and OpenAI speak.
pub mod openai_compat;
pub mod types;

pub use self::types::{
    ChatMessage, ChatRequest, ChatResponse, LlmError, MessageRole, Usage,
};

use crate::apis::stats::ApiStats;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    RedPill,
    OpenAi,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::RedPill => "redpill",
            Provider::OpenAi => "openai",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::RedPill => "https://api.red-pill.ai/v1",
            Provider::OpenAi => "https://api.openai.com/v1",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redpill" | "red-pill" => Ok(Provider::RedPill),
            "openai" => Ok(Provider::OpenAi),
            other => Err(format!("Unknown LLM provider: {}", other)),
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    fn is_enabled(&self) -> bool;

    async fn call(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;

    fn get_stats(&self) -> ApiStats;

    /// (max requests per minute, minimum spacing between requests)
    fn rate_limit_info(&self) -> (usize, Duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("RedPill".parse::<Provider>(), Ok(Provider::RedPill));
        assert_eq!("openai".parse::<Provider>(), Ok(Provider::OpenAi));
        assert!("gemini".parse::<Provider>().is_err());
        assert_eq!(
            Provider::RedPill.default_base_url(),
            "https://api.red-pill.ai/v1"
        );
    }
}
