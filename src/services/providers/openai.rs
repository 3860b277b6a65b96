/// OpenAI chat completions provider
///
/// Sends a single user message with a strict `json_schema` response format
/// and returns the message content. Works against any endpoint that speaks
/// the `/chat/completions` wire format.
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    services::providers::{ChatProvider, StructuredPrompt},
};

#[derive(Clone)]
pub struct OpenAiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl OpenAiProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
            temperature,
            max_tokens,
        }
    }

    fn build_request<'a>(&'a self, request: &'a StructuredPrompt) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: &request.schema_name,
                    strict: true,
                    schema: &request.schema,
                },
            },
        }
    }

    /// Pulls the message content out of a completion response body
    fn extract_content(response_text: &str) -> AppResult<String> {
        let response: ChatCompletionResponse = serde_json::from_str(response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize chat completion response"
            );
            AppError::ExternalApi(format!("Failed to parse chat completion response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ExternalApi("Model returned no choices".to_string()))?;

        if let Some(refusal) = choice.message.refusal {
            return Err(AppError::ExternalApi(format!("Model refused the request: {}", refusal)));
        }

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(AppError::ExternalApi(format!(
                "Model returned an empty message (finish_reason: {})",
                choice.finish_reason.as_deref().unwrap_or("unknown")
            ))),
        }
    }
}

#[async_trait::async_trait]
impl ChatProvider for OpenAiProvider {
    async fn complete(&self, request: &StructuredPrompt) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Chat completions API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(response = %response_text, "Raw chat completion response");

        Self::extract_content(&response_text)
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}
