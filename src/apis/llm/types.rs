/// Provider-neutral chat completion types
///
/// Provider clients translate these to and from their own wire formats.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat message with role and content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier; an empty string means "use the client's default"
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Content of the first choice, verbatim
    pub content: String,
    pub usage: Usage,
    pub finish_reason: String,
    pub model: String,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// LLM API errors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LlmError {
    RateLimited {
        provider: String,
        retry_after_ms: Option<u64>,
    },
    Timeout {
        provider: String,
        timeout_ms: u64,
    },
    InvalidResponse {
        provider: String,
        message: String,
    },
    AuthError {
        provider: String,
        message: String,
    },
    NetworkError {
        provider: String,
        message: String,
    },
    ParseError {
        provider: String,
        message: String,
    },
    ApiError {
        provider: String,
        status_code: u16,
        message: String,
    },
    /// No credentials configured for the provider
    ProviderDisabled {
        provider: String,
    },
}

impl LlmError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::RateLimited { .. } => Some(429),
            LlmError::AuthError { .. } => Some(401),
            LlmError::ApiError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::RateLimited {
                provider,
                retry_after_ms,
            } => match retry_after_ms {
                Some(ms) => write!(f, "[{}] Rate limited (retry after {}ms)", provider, ms),
                None => write!(f, "[{}] Rate limited", provider),
            },
            LlmError::Timeout {
                provider,
                timeout_ms,
            } => write!(f, "[{}] Request timeout ({}ms)", provider, timeout_ms),
            LlmError::InvalidResponse { provider, message } => {
                write!(f, "[{}] Invalid response: {}", provider, message)
            }
            LlmError::AuthError { provider, message } => {
                write!(f, "[{}] Auth error: {}", provider, message)
            }
            LlmError::NetworkError { provider, message } => {
                write!(f, "[{}] Network error: {}", provider, message)
            }
            LlmError::ParseError { provider, message } => {
                write!(f, "[{}] Parse error: {}", provider, message)
            }
            LlmError::ApiError {
                provider,
                status_code,
                message,
            } => write!(f, "[{}] API error {}: {}", provider, status_code, message),
            LlmError::ProviderDisabled { provider } => {
                write!(f, "[{}] Provider has no credentials configured", provider)
            }
        }
    }
}

impl std::error::Error for LlmError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_without_unset_options() {
        let request = ChatRequest::new("m", vec![ChatMessage::user("hi")]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_error_status_codes() {
        let err = LlmError::ApiError {
            provider: "redpill".to_string(),
            status_code: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.to_string(), "[redpill] API error 502: bad gateway");

        let err = LlmError::Timeout {
            provider: "redpill".to_string(),
            timeout_ms: 10_000,
        };
        assert_eq!(err.status_code(), None);
    }
}
