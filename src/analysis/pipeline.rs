/// Per-request analysis pipeline
///
/// text -> mentions -> market data -> AI summary -> persisted record.
/// Each early exit is an explicit [`AnalysisOutcome`]; only `Completed`
/// produces a response body.
use crate::analysis::prompt::build_prompt;
use crate::analysis::types::{
    AnalysisRecord, DetectionContext, MarketDataSummary, WebhookPayload, WebhookResponse,
};
use crate::apis::llm::{ChatMessage, ChatRequest, LlmClient};
use crate::clock::Clock;
use crate::logger::{self, LogTag};
use crate::marketdata::MarketDataService;
use crate::storage::AnalysisStore;
use crate::tokens::{MentionDetector, TokenSummary};
use std::sync::Arc;

/// Detected tokens carried past detection, best rank first
pub const PRIMARY_MENTIONS_PER_REQUEST: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    NoText,
    NoMatch,
    NoMarketData,
    SummarizerNotConfigured,
    SummaryUnavailable,
    PersistFailed,
    Completed(Box<CompletedAnalysis>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedAnalysis {
    pub record: AnalysisRecord,
    pub response: WebhookResponse,
}

impl AnalysisOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisOutcome::NoText => "no_text",
            AnalysisOutcome::NoMatch => "no_match",
            AnalysisOutcome::NoMarketData => "no_market_data",
            AnalysisOutcome::SummarizerNotConfigured => "summarizer_not_configured",
            AnalysisOutcome::SummaryUnavailable => "summary_unavailable",
            AnalysisOutcome::PersistFailed => "persist_failed",
            AnalysisOutcome::Completed(_) => "completed",
        }
    }

    /// Response body, present only for completed analyses
    pub fn response(&self) -> Option<&WebhookResponse> {
        match self {
            AnalysisOutcome::Completed(done) => Some(&done.response),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub app_id: String,
    pub temperature: f32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            app_id: "poyo".to_string(),
            temperature: 1.0,
        }
    }
}

pub struct AnalysisPipeline {
    detector: Arc<MentionDetector>,
    market_data: Arc<MarketDataService>,
    summarizer: Option<Arc<dyn LlmClient>>,
    store: Arc<AnalysisStore>,
    clock: Arc<dyn Clock>,
    settings: PipelineSettings,
}

impl AnalysisPipeline {
    pub fn new(
        detector: Arc<MentionDetector>,
        market_data: Arc<MarketDataService>,
        summarizer: Option<Arc<dyn LlmClient>>,
        store: Arc<AnalysisStore>,
        clock: Arc<dyn Clock>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            detector,
            market_data,
            summarizer,
            store,
            clock,
            settings,
        }
    }

    pub fn summarizer(&self) -> Option<&Arc<dyn LlmClient>> {
        self.summarizer.as_ref()
    }

    pub async fn process(&self, payload: &WebhookPayload) -> AnalysisOutcome {
        let outcome = self.run(payload).await;
        match &outcome {
            AnalysisOutcome::Completed(done) => logger::info(
                LogTag::Webhook,
                &format!(
                    "Analysis completed for {} ({})",
                    done.record.name, done.record.symbol
                ),
            ),
            other => logger::debug(
                LogTag::Webhook,
                &format!("Webhook ended without analysis: {}", other.as_str()),
            ),
        }
        outcome
    }

    async fn run(&self, payload: &WebhookPayload) -> AnalysisOutcome {
        let text = payload.full_text();
        if text.trim().is_empty() {
            return AnalysisOutcome::NoText;
        }

        let mentions = self.detector.detect_mentions(&text).await;
        let Some(primary) = mentions
            .iter()
            .take(PRIMARY_MENTIONS_PER_REQUEST)
            .next()
            .cloned()
        else {
            return AnalysisOutcome::NoMatch;
        };

        let ids: Vec<i64> = mentions.iter().map(|t| t.id).collect();
        let quotes = match self.market_data.get_market_data(&ids).await {
            Ok(quotes) => quotes,
            Err(e) => {
                logger::warning(
                    LogTag::MarketData,
                    &format!("No market data for {}: {}", primary.label(), e),
                );
                return AnalysisOutcome::NoMarketData;
            }
        };
        let Some(quote) = quotes.into_iter().find(|q| q.id == primary.id) else {
            logger::warning(
                LogTag::MarketData,
                &format!("Provider returned no quote for {}", primary.label()),
            );
            return AnalysisOutcome::NoMarketData;
        };

        let Some(summarizer) = self.summarizer.as_ref().filter(|s| s.is_enabled()) else {
            logger::debug(LogTag::Ai, "Skipping AI analysis, summarizer not configured");
            return AnalysisOutcome::SummarizerNotConfigured;
        };

        let request = ChatRequest::new("", vec![ChatMessage::user(build_prompt(&quote))])
            .with_temperature(self.settings.temperature);
        let summary = match summarizer.call(request).await {
            Ok(response) if !response.content.trim().is_empty() => response.content,
            Ok(_) => {
                logger::warning(LogTag::Ai, "Summarizer returned empty content");
                return AnalysisOutcome::SummaryUnavailable;
            }
            Err(e) => {
                logger::error(
                    LogTag::Ai,
                    &format!("AI analysis failed for {}: {}", primary.label(), e),
                );
                return AnalysisOutcome::SummaryUnavailable;
            }
        };

        let record = self.build_record(&primary, &text, MarketDataSummary::from(&quote), summary);
        if let Err(e) = self.store.append(record.clone()).await {
            logger::error(
                LogTag::Storage,
                &format!("Failed to save analysis for {}: {}", primary.label(), e),
            );
            return AnalysisOutcome::PersistFailed;
        }

        let response = WebhookResponse::success(&self.settings.app_id, &record);
        AnalysisOutcome::Completed(Box::new(CompletedAnalysis { record, response }))
    }

    fn build_record(
        &self,
        token: &TokenSummary,
        text: &str,
        market_data: MarketDataSummary,
        summary: String,
    ) -> AnalysisRecord {
        AnalysisRecord {
            coin_id: token.id,
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            market_data,
            detection_context: DetectionContext::new(text, token),
            ai_analysis: Some(summary),
            timestamp: self.clock.now(),
        }
    }
}
