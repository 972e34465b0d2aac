//! Video composition port

use async_trait::async_trait;

use crate::domain::value_objects::CompositionMode;

/// Everything the composer needs to render one video
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionJob {
    pub storyboard_image: String,
    pub audio_url: Option<String>,
    pub scene_count: usize,
    pub mode: CompositionMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedVideo {
    pub video_url: String,
    pub simulated: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComposerError {
    #[error("Composition failed: {0}")]
    Failed(String),
}

/// Port for the video composition backend
#[async_trait]
pub trait VideoComposerPort: Send + Sync {
    async fn compose(&self, job: &CompositionJob) -> Result<ComposedVideo, ComposerError>;
}
