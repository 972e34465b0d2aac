//! Composition Service - storyboard plus narration into a video reference

use std::sync::Arc;

use crate::application::ports::outbound::{CompositionJob, VideoComposerPort};
use crate::application::services::generation::{FallbackReason, GatewayError, Generated};
use crate::domain::entities::VideoArtifact;
use crate::domain::value_objects::CompositionMode;

pub const PLACEHOLDER_VIDEO_URL: &str = "/placeholder-video.mp4";

/// Service for composing the final video
pub struct CompositionService {
    composer: Arc<dyn VideoComposerPort>,
    seconds_per_scene: u32,
}

impl CompositionService {
    pub fn new(composer: Arc<dyn VideoComposerPort>, seconds_per_scene: u32) -> Self {
        Self {
            composer,
            seconds_per_scene,
        }
    }

    /// Video length for `scene_count` scenes
    pub fn duration_for(&self, scene_count: usize) -> u32 {
        scene_count as u32 * self.seconds_per_scene
    }

    /// Compose a video from the storyboard and optional narration audio
    ///
    /// Requests without a storyboard are rejected before the composer is
    /// involved.
    pub async fn compose(
        &self,
        storyboard_image: &str,
        audio_url: Option<&str>,
        scene_count: usize,
        mode: CompositionMode,
    ) -> Result<Generated<VideoArtifact>, GatewayError> {
        if storyboard_image.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("Storyboard image is required".to_string()));
        }
        tracing::info!("Composing video in {} mode ({} scenes)", mode.as_str(), scene_count);

        let job = CompositionJob {
            storyboard_image: storyboard_image.to_string(),
            audio_url: audio_url.map(str::to_string),
            scene_count,
            mode,
        };

        let artifact = |video_url: String, simulated: bool| VideoArtifact {
            video_url,
            duration_secs: self.duration_for(scene_count),
            thumbnail_url: storyboard_image.to_string(),
            mode,
            simulated,
            message: composition_message(mode, simulated),
        };

        match self.composer.compose(&job).await {
            Ok(video) => Ok(Generated::Success(artifact(video.video_url, video.simulated))),
            Err(e) => {
                tracing::error!("Error composing video: {}", e);
                Ok(Generated::fallback(
                    FallbackReason::Provider(e.to_string()),
                    artifact(PLACEHOLDER_VIDEO_URL.to_string(), true),
                ))
            }
        }
    }
}

fn composition_message(mode: CompositionMode, simulated: bool) -> String {
    match (mode, simulated) {
        (CompositionMode::Cinematic, true) => "Cinematic video generation is simulated".to_string(),
        (CompositionMode::Cinematic, false) => "Cinematic video generated successfully".to_string(),
        (CompositionMode::Slideshow, _) => "Slideshow video generated successfully".to_string(),
    }
}
