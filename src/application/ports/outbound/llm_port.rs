//! Text generation port - the outline model

use async_trait::async_trait;

/// A single-prompt text generation request
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    pub prompt: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.9,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }
}

/// Text returned by the model
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LlmError {
    #[error("Text generation API key not configured")]
    NotConfigured,
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("No content in model response")]
    EmptyResponse,
}

/// Port for the text generation provider
#[async_trait]
pub trait LlmPort: Send + Sync {
    /// Whether a credential is available; requests fail with
    /// `LlmError::NotConfigured` otherwise
    fn is_configured(&self) -> bool;

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}
