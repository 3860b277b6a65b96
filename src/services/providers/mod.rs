/// Chat model provider abstraction
///
/// The recommender talks to the hosted model only through [`ChatProvider`],
/// so tests can swap in a mock and deployments can point at any
/// OpenAI-compatible endpoint.
use serde_json::Value;

use crate::error::AppResult;

pub mod openai;

pub use openai::OpenAiProvider;

/// A single prompt plus the JSON schema the reply must follow
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredPrompt {
    pub prompt: String,
    pub schema_name: String,
    pub schema: Value,
}

/// Trait for hosted chat completion providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
    /// Sends one prompt and returns the raw text of the model's reply
    ///
    /// Transport failures, non-success statuses, refusals and empty
    /// replies are all reported as errors; the caller parses the text.
    async fn complete(&self, request: &StructuredPrompt) -> AppResult<String>;

    /// Model identifier for logging
    fn model(&self) -> String;
}
