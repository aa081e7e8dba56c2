//! Language-model HTTP client (OpenAI-compatible chat completions).
//!
//! Both supported providers speak this format: OpenAI natively and Gemini
//! through its OpenAI-compatible endpoint.

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ModelResponse, WireTool};
use crate::tools::ToolSpec;
use crate::types::{Config, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use tracing::{debug, info, warn};

/// A chat model that can be asked to call tools.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the conversation with `tools` bound; an empty slice binds none.
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> Result<ModelResponse>;
}

/// Chat-completions client with bearer-token auth.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(config: &Config, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(config.http.timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: config.llm.model().to_string(),
            base_url: config.llm.base_url().trim_end_matches('/').to_string(),
            temperature: config.llm.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> Result<ModelResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages,
            tools: tools.iter().map(WireTool::from).collect(),
        };

        debug!(%url, messages = messages.len(), tools = tools.len(), "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%status, "chat completion rejected");
            return Err(Error::model(format!("{}: {}", status, body)));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| Error::model(format!("Failed to parse response: {} - {}", e, body)))?;

        let message = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::model("response contained no choices"))?
            .message;

        let response = ModelResponse::from_message(message);
        info!(
            model = %self.model,
            tool_calls = response.tool_calls.len(),
            has_content = response.content.is_some(),
            "chat completion received"
        );
        Ok(response)
    }
}
