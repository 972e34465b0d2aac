//! Narration Service - speech for the full story text
//!
//! Narration never fails the pipeline: without a credential, on rejected
//! credentials, or on any provider failure the client is told to use its
//! own speech synthesis instead.

use std::sync::Arc;

use base64::Engine;

use crate::application::ports::outbound::{SpeechRequest, SpeechSynthesisError, SpeechSynthesisPort};
use crate::application::services::generation::{FallbackReason, GatewayError, Generated};
use crate::domain::entities::NarrationArtifact;

pub const SYNTHESIZED_MESSAGE: &str = "Audio narration generated successfully";
pub const LOCAL_SYNTHESIS_MESSAGE: &str = "Using browser text-to-speech for narration.";

/// Service for producing narration audio
pub struct NarrationService {
    speech: Arc<dyn SpeechSynthesisPort>,
    nominal_duration_secs: u32,
}

impl NarrationService {
    pub fn new(speech: Arc<dyn SpeechSynthesisPort>, nominal_duration_secs: u32) -> Self {
        Self {
            speech,
            nominal_duration_secs,
        }
    }

    /// Synthesise `text`, or decide on local synthesis
    ///
    /// The reported duration is a fixed estimate, not the audio length.
    pub async fn narrate(
        &self,
        text: &str,
        voice_id: Option<&str>,
    ) -> Result<Generated<NarrationArtifact>, GatewayError> {
        if text.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("Text is required".to_string()));
        }

        if !self.speech.is_configured() {
            tracing::info!("No speech synthesis key, narration falls back to local synthesis");
            return Ok(Generated::fallback(FallbackReason::NotConfigured, self.local()));
        }

        let request = SpeechRequest {
            text: text.to_string(),
            voice_id: voice_id.map(str::to_string).filter(|v| !v.trim().is_empty()),
        };

        match self.speech.synthesize(request).await {
            Ok(speech) => {
                tracing::info!("Synthesized narration ({} bytes of {})", speech.audio.len(), speech.mime_type);
                let encoded = base64::engine::general_purpose::STANDARD.encode(&speech.audio);
                Ok(Generated::Success(NarrationArtifact::Synthesized {
                    audio_url: format!("data:{};base64,{}", speech.mime_type, encoded),
                    duration_secs: self.nominal_duration_secs,
                }))
            }
            Err(SpeechSynthesisError::Unauthorized(status)) => {
                tracing::debug!("Speech provider rejected credentials ({})", status);
                Ok(Generated::fallback(FallbackReason::Unauthorized, self.local()))
            }
            Err(SpeechSynthesisError::NotConfigured) => {
                Ok(Generated::fallback(FallbackReason::NotConfigured, self.local()))
            }
            Err(SpeechSynthesisError::Api { status, message }) => {
                tracing::error!("Speech API error: {} {}", status, message);
                Ok(Generated::fallback(
                    FallbackReason::Provider(format!("{}: {}", status, message)),
                    self.local(),
                ))
            }
            Err(SpeechSynthesisError::Http(message)) => {
                tracing::error!("Speech request failed: {}", message);
                Ok(Generated::fallback(FallbackReason::Transport(message), self.local()))
            }
        }
    }

    fn local(&self) -> NarrationArtifact {
        NarrationArtifact::LocalSynthesis {
            duration_secs: self.nominal_duration_secs,
        }
    }
}
