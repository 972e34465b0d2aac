//! Application configuration

use std::env;

use anyhow::{Context, Result};

use crate::domain::value_objects::{AppSettings, StoryMode};

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Application configuration loaded from environment
///
/// Provider keys are optional: a missing key is reported per request, not
/// at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini API key for outline generation
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,

    /// Imagen API key for storyboard generation
    pub imagen_api_key: Option<String>,
    pub google_cloud_project_id: String,
    pub google_cloud_location: String,
    pub imagen_model: String,
    pub imagen_base_url: String,

    /// ElevenLabs API key for narration
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub elevenlabs_model: String,
    pub elevenlabs_default_voice: String,

    /// Outline and storyboard prompt variant
    pub story_mode: StoryMode,

    /// HTTP server port
    pub server_port: u16,

    /// Pipeline tunables
    pub settings: AppSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let google_cloud_location =
            env::var("GOOGLE_CLOUD_LOCATION").unwrap_or_else(|_| "us-central1".to_string());

        Ok(Self {
            gemini_api_key: optional("GEMINI_API_KEY"),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash-exp".to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),

            imagen_api_key: optional("IMAGEN_API_KEY"),
            google_cloud_project_id: env::var("GOOGLE_CLOUD_PROJECT_ID")
                .unwrap_or_else(|_| "your-project-id".to_string()),
            imagen_model: env::var("IMAGEN_MODEL")
                .unwrap_or_else(|_| "imagen-3.0-generate-001".to_string()),
            imagen_base_url: env::var("IMAGEN_BASE_URL").unwrap_or_else(|_| {
                format!("https://{}-aiplatform.googleapis.com", google_cloud_location)
            }),
            google_cloud_location,

            elevenlabs_api_key: optional("ELEVENLABS_API_KEY"),
            elevenlabs_base_url: env::var("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ELEVENLABS_BASE_URL.to_string()),
            elevenlabs_model: env::var("ELEVENLABS_MODEL")
                .unwrap_or_else(|_| "eleven_multilingual_v2".to_string()),
            elevenlabs_default_voice: env::var("ELEVENLABS_DEFAULT_VOICE")
                .unwrap_or_else(|_| "21m00Tcm4TlvDq8ikWAM".to_string()),

            story_mode: env::var("STORY_MODE")
                .unwrap_or_else(|_| "generic".to_string())
                .parse::<StoryMode>()
                .map_err(|e| anyhow::anyhow!("STORY_MODE must be 'generic' or 'character_focused': {}", e))?,

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            settings: AppSettings::from_env(),
        })
    }
}

/// An unset or blank variable counts as absent
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
