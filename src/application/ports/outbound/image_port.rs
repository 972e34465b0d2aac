//! Image generation port - the storyboard model

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub aspect_ratio: String,
    pub sample_count: u32,
}

impl ImageRequest {
    /// Portrait page, one sample
    pub fn storyboard_page(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: "3:4".to_string(),
            sample_count: 1,
        }
    }
}

/// Raw generated image, base64 encoded PNG
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub base64_png: String,
}

impl GeneratedImage {
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.base64_png)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImageGenerationError {
    #[error("Image generation API key not configured")]
    NotConfigured,
    #[error("Image generation quota exceeded: {0}")]
    QuotaExceeded(String),
    #[error("Image API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("No image data in response")]
    MissingImageData,
    #[error("Unreadable image response: {0}")]
    Malformed(String),
}

impl ImageGenerationError {
    /// Rate-limit or usage-limit failure, including ones only recognisable
    /// from the message text
    pub fn is_quota(&self) -> bool {
        match self {
            Self::QuotaExceeded(_) => true,
            Self::Api { status, message } => {
                *status == 429 || mentions_quota(message)
            }
            Self::Http(message) => mentions_quota(message),
            Self::NotConfigured | Self::MissingImageData | Self::Malformed(_) => false,
        }
    }
}

fn mentions_quota(message: &str) -> bool {
    message.contains("429") || message.to_ascii_lowercase().contains("quota")
}

/// Port for the image generation provider
#[async_trait]
pub trait ImageGenerationPort: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn generate(&self, request: ImageRequest) -> Result<GeneratedImage, ImageGenerationError>;
}
