//! Speech synthesis port - the narration voice

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    /// Provider voice; the provider default is used when absent
    pub voice_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedSpeech {
    pub audio: Vec<u8>,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpeechSynthesisError {
    #[error("Speech synthesis API key not configured")]
    NotConfigured,
    #[error("Speech synthesis rejected credentials ({0})")]
    Unauthorized(u16),
    #[error("Speech API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("HTTP request failed: {0}")]
    Http(String),
}

/// Port for the text-to-speech provider
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn synthesize(&self, request: SpeechRequest) -> Result<SynthesizedSpeech, SpeechSynthesisError>;
}
