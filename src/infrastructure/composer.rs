//! Simulated video composer
//!
//! No encoder is wired in yet: the composer waits for the configured
//! latency and hands back the placeholder video.

use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::outbound::{ComposedVideo, ComposerError, CompositionJob, VideoComposerPort};
use crate::application::services::composition_service::PLACEHOLDER_VIDEO_URL;

pub struct SimulatedComposer {
    latency: Duration,
}

impl SimulatedComposer {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl VideoComposerPort for SimulatedComposer {
    async fn compose(&self, job: &CompositionJob) -> Result<ComposedVideo, ComposerError> {
        tracing::debug!(
            "Simulating {} composition of {} scenes (audio: {})",
            job.mode.as_str(),
            job.scene_count,
            job.audio_url.is_some()
        );
        tokio::time::sleep(self.latency).await;
        Ok(ComposedVideo {
            video_url: PLACEHOLDER_VIDEO_URL.to_string(),
            simulated: true,
        })
    }
}
