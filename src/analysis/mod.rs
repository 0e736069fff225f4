/// Webhook analysis: payload parsing, prompt construction and the
/// detection-to-persistence pipeline
pub mod pipeline;
pub mod prompt;
pub mod types;

pub use self::pipeline::{AnalysisOutcome, AnalysisPipeline, PipelineSettings, PRIMARY_MENTIONS_PER_REQUEST};
pub use self::types::{AnalysisRecord, WebhookPayload, WebhookResponse};
