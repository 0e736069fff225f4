/// OpenAI-compatible chat completions client (raw HTTP via reqwest)
///
/// Endpoint: POST {base_url}/chat/completions with Bearer authentication.
/// Used for RedPill (the default summarizer) and OpenAI itself.
pub mod types;

use self::types::{CompletionMessage, CompletionRequest, CompletionResponse};
use crate::apis::client::{HttpClient, RateLimiter};
use crate::apis::llm::{ChatRequest, ChatResponse, LlmClient, LlmError, Provider, Usage};
use crate::apis::stats::{ApiStats, ApiStatsTracker};
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

const ENDPOINT_CHAT: &str = "/chat/completions";
const DEFAULT_RATE_LIMIT_PER_MINUTE: usize = 60;

pub struct OpenAiCompatClient {
    provider: Provider,
    base_url: String,
    api_key: String,
    model: String,
    http_client: HttpClient,
    rate_limiter: RateLimiter,
    stats: Arc<ApiStatsTracker>,
}

impl OpenAiCompatClient {
    /// Create a client; an empty `base_url` falls back to the provider's default
    pub fn new(
        provider: Provider,
        base_url: &str,
        api_key: String,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self, String> {
        if api_key.trim().is_empty() {
            return Err(format!("{} API key cannot be empty", provider));
        }
        if model.trim().is_empty() {
            return Err(format!("{} model cannot be empty", provider));
        }

        let base_url = if base_url.trim().is_empty() {
            provider.default_base_url().to_string()
        } else {
            base_url.trim_end_matches('/').to_string()
        };

        Ok(Self {
            provider,
            base_url,
            api_key,
            model,
            http_client: HttpClient::new(timeout_secs)?,
            rate_limiter: RateLimiter::new(DEFAULT_RATE_LIMIT_PER_MINUTE),
            stats: Arc::new(ApiStatsTracker::new()),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, ENDPOINT_CHAT)
    }

    fn build_request(&self, request: ChatRequest) -> CompletionRequest {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model
        };

        CompletionRequest {
            model,
            messages: request
                .messages
                .into_iter()
                .map(|msg| CompletionMessage {
                    role: msg.role.as_str().to_string(),
                    content: msg.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    fn parse_response(
        &self,
        response: CompletionResponse,
        latency_ms: f64,
    ) -> Result<ChatResponse, LlmError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: self.provider.to_string(),
                message: "No choices in response".to_string(),
            })?;

        let content = choice
            .message
            .content
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: self.provider.to_string(),
                message: "First choice has no content".to_string(),
            })?;

        let usage = response
            .usage
            .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(ChatResponse {
            content,
            usage,
            finish_reason: choice.finish_reason.unwrap_or_default(),
            model: response.model,
            latency_ms,
        })
    }

    async fn execute_request(
        &self,
        request: CompletionRequest,
    ) -> Result<(CompletionResponse, f64), LlmError> {
        self.rate_limiter.acquire().await;

        let provider = self.provider.to_string();
        logger::debug(
            LogTag::Ai,
            &format!(
                "[{}] Calling chat completions: model={}",
                provider.to_uppercase(),
                request.model
            ),
        );

        let start = Instant::now();
        let response = self
            .http_client
            .client()
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        provider: provider.clone(),
                        timeout_ms: self.http_client.timeout().as_millis() as u64,
                    }
                } else {
                    LlmError::NetworkError {
                        provider: provider.clone(),
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;
        let elapsed = start.elapsed().as_secs_f64() * 1000.0;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(|s| s * 1000);
            let error_body = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthError {
                    provider,
                    message: "Invalid API key".to_string(),
                },
                429 => LlmError::RateLimited {
                    provider,
                    retry_after_ms: retry_after,
                },
                code => LlmError::ApiError {
                    provider,
                    status_code: code,
                    message: error_body,
                },
            });
        }

        let parsed = response
            .json::<CompletionResponse>()
            .await
            .map_err(|e| LlmError::ParseError {
                provider,
                message: format!("Failed to parse response: {}", e),
            })?;

        Ok((parsed, elapsed))
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn call(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let request = self.build_request(request);

        let (response, latency_ms) = match self.execute_request(request).await {
            Ok(result) => {
                self.stats.record_request(true, result.1);
                result
            }
            Err(e) => {
                self.stats.record_request(false, 0.0);
                self.stats.record_error("chat_completion", e.to_string());
                return Err(e);
            }
        };

        self.parse_response(response, latency_ms)
    }

    fn get_stats(&self) -> ApiStats {
        self.stats.get_stats()
    }

    fn rate_limit_info(&self) -> (usize, Duration) {
        (
            self.rate_limiter.max_per_minute(),
            self.rate_limiter.min_interval(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::llm::ChatMessage;

    fn client() -> OpenAiCompatClient {
        OpenAiCompatClient::new(
            Provider::RedPill,
            "",
            "sk-test".to_string(),
            "claude-3-5-sonnet-20241022".to_string(),
            10,
        )
        .unwrap()
    }

    #[test]
    fn test_client_requires_key() {
        let result = OpenAiCompatClient::new(
            Provider::RedPill,
            "",
            "  ".to_string(),
            "model".to_string(),
            10,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_uses_provider_default() {
        assert_eq!(
            client().endpoint(),
            "https://api.red-pill.ai/v1/chat/completions"
        );

        let custom = OpenAiCompatClient::new(
            Provider::OpenAi,
            "http://localhost:8080/v1/",
            "sk".to_string(),
            "gpt-4o-mini".to_string(),
            5,
        )
        .unwrap();
        assert_eq!(custom.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_build_request_fills_default_model() {
        let request = ChatRequest::new("", vec![ChatMessage::user("Analyze")]).with_temperature(1.0);
        let built = client().build_request(request);

        assert_eq!(built.model, "claude-3-5-sonnet-20241022");
        assert_eq!(built.messages[0].role, "user");
        assert_eq!(built.temperature, Some(1.0));
    }

    #[test]
    fn test_parse_response_uses_first_choice_verbatim() {
        let raw = serde_json::json!({
            "id": "cmpl-1",
            "model": "claude-3-5-sonnet-20241022",
            "choices": [
                { "message": { "role": "assistant", "content": "Summary: up\nScore: 4/5" }, "finish_reason": "stop" },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        });
        let parsed: CompletionResponse = serde_json::from_value(raw).unwrap();
        let response = client().parse_response(parsed, 12.0).unwrap();

        assert_eq!(response.content, "Summary: up\nScore: 4/5");
        assert_eq!(response.finish_reason, "stop");
        assert_eq!(response.usage, Usage::default());
    }

    #[test]
    fn test_parse_response_without_choices_fails() {
        let parsed: CompletionResponse =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        assert!(matches!(
            client().parse_response(parsed, 1.0),
            Err(LlmError::InvalidResponse { .. })
        ));
    }
}
