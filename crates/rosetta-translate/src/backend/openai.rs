use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatBackend, ChatRequest};
use crate::{Result, TranslateError};

/// Public OpenAI API root.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// OpenAI chat-completions client.
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Creates a client. `base_url` defaults to the public API.
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TranslateError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or(DEFAULT_OPENAI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionBody {
            model: &request.model,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(model = %request.model, "Requesting chat completion");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompletionResponse = response.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(TranslateError::EmptyResponse);
        }
        Ok(text)
    }
}
