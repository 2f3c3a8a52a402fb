//! Chat-completion backends.

mod openai;

use async_trait::async_trait;

use crate::Result;

pub use openai::{OpenAiClient, DEFAULT_OPENAI_BASE_URL};

/// A single-message completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Something that turns a prompt into a reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns the trimmed text of the first choice.
    ///
    /// An empty reply is an error.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}
