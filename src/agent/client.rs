//! Chat-completions client for the hosted agent.
//!
//! One request per user turn: the fixed system instruction plus the current
//! utterance. No streaming, no retries; the caller decides what a failure
//! means. The endpoint is OpenAI-compatible (Groq).

use crate::error::{AgentError, AgentResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// The seam between the chat pipeline and the hosted model. Implementations
/// must block the caller until the response or failure arrives.
#[async_trait]
pub trait SqlAgent: Send + Sync {
    /// Send one utterance under the fixed instruction; return the raw
    /// response text.
    async fn generate(&self, instruction: &str, utterance: &str) -> AgentResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

/// Groq-backed agent.
pub struct GroqAgent {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GroqAgent {
    /// Create a new agent against the public Groq endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Override the base URL (used by tests against a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SqlAgent for GroqAgent {
    async fn generate(&self, instruction: &str, utterance: &str) -> AgentResult<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: instruction,
                },
                Message {
                    role: "user",
                    content: utterance,
                },
            ],
            temperature: self.temperature,
        };

        debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::api(status.as_u16(), body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AgentError::malformed(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AgentError::malformed("response contained no choices"))?;

        debug!(chars = content.len(), "Received chat completion");
        Ok(content)
    }
}
