//! ElevenLabs client for narration audio

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Serialize;

use crate::application::ports::outbound::{
    SpeechRequest, SpeechSynthesisError, SpeechSynthesisPort, SynthesizedSpeech,
};

const DEFAULT_MIME_TYPE: &str = "audio/mpeg";

/// Client for the ElevenLabs text-to-speech API
pub struct ElevenLabsClient {
    client: Client,
    base_url: String,
    model: String,
    default_voice: String,
    api_key: Option<String>,
}

impl ElevenLabsClient {
    pub fn new(base_url: &str, model: &str, default_voice: &str, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            default_voice: default_voice.to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl SpeechSynthesisPort for ElevenLabsClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn synthesize(&self, request: SpeechRequest) -> Result<SynthesizedSpeech, SpeechSynthesisError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SpeechSynthesisError::NotConfigured)?;
        let voice = request.voice_id.as_deref().unwrap_or(&self.default_voice);

        let body = TextToSpeechRequest {
            text: &request.text,
            model_id: &self.model,
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.75,
                style: 0.5,
                use_speaker_boost: true,
            },
        };

        let response = self
            .client
            .post(format!("{}/text-to-speech/{}", self.base_url, voice))
            .header("xi-api-key", api_key)
            .header(header::ACCEPT, DEFAULT_MIME_TYPE)
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechSynthesisError::Http(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SpeechSynthesisError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpeechSynthesisError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let mime_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .filter(|value| value.starts_with("audio/"))
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechSynthesisError::Http(e.to_string()))?
            .to_vec();

        tracing::debug!("ElevenLabs returned {} bytes of {}", audio.len(), mime_type);

        Ok(SynthesizedSpeech { audio, mime_type })
    }
}

#[derive(Debug, Serialize)]
struct TextToSpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, key: Option<&str>) -> ElevenLabsClient {
        ElevenLabsClient::new(
            &server.uri(),
            "eleven_multilingual_v2",
            "default-voice",
            key.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn test_synthesize_uses_default_voice_and_settings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/text-to-speech/default-voice"))
            .and(header_eq("xi-api-key", "secret"))
            .and(body_partial_json(json!({
                "text": "Once upon a time",
                "model_id": "eleven_multilingual_v2",
                "voice_settings": {"similarity_boost": 0.75, "use_speaker_boost": true}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "audio/mpeg")
                    .set_body_bytes(vec![1u8, 2, 3]),
            )
            .expect(1)
            .mount(&server)
            .await;

        let speech = client(&server, Some("secret"))
            .synthesize(SpeechRequest {
                text: "Once upon a time".to_string(),
                voice_id: None,
            })
            .await
            .unwrap();

        assert_eq!(speech.audio, vec![1, 2, 3]);
        assert_eq!(speech.mime_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_explicit_voice_is_used() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/text-to-speech/narrator-2"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8]))
            .expect(1)
            .mount(&server)
            .await;

        let speech = client(&server, Some("secret"))
            .synthesize(SpeechRequest {
                text: "Hello".to_string(),
                voice_id: Some("narrator-2".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(speech.mime_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_rejected_key_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let error = client(&server, Some("expired"))
            .synthesize(SpeechRequest {
                text: "Hello".to_string(),
                voice_id: None,
            })
            .await
            .unwrap_err();

        assert_eq!(error, SpeechSynthesisError::Unauthorized(401));
    }
}
