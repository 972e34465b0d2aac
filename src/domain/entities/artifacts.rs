//! Generated artifacts - storyboard, narration and video
//!
//! A story holds at most one of each; regenerating replaces the current one.

use crate::domain::value_objects::CompositionMode;

/// A single composed page with every scene drawn as a panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryboardArtifact {
    /// `data:image/png;base64,...` for a generated page, a placeholder URL otherwise
    pub image: String,
    pub placeholder: bool,
    pub quota_exceeded: bool,
    pub message: Option<String>,
}

impl StoryboardArtifact {
    pub fn generated(image: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            placeholder: false,
            quota_exceeded: false,
            message: Some(message.into()),
        }
    }

    pub fn placeholder(image: impl Into<String>, quota_exceeded: bool, message: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            placeholder: true,
            quota_exceeded,
            message: Some(message.into()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// How the story will be read aloud
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationArtifact {
    /// Audio synthesised by the speech provider
    Synthesized { audio_url: String, duration_secs: u32 },
    /// The client should use its own speech synthesis
    LocalSynthesis { duration_secs: u32 },
}

impl NarrationArtifact {
    pub fn audio_url(&self) -> Option<&str> {
        match self {
            Self::Synthesized { audio_url, .. } => Some(audio_url),
            Self::LocalSynthesis { .. } => None,
        }
    }

    pub fn duration_secs(&self) -> u32 {
        match self {
            Self::Synthesized { duration_secs, .. } | Self::LocalSynthesis { duration_secs } => {
                *duration_secs
            }
        }
    }

    pub fn uses_local_synthesis(&self) -> bool {
        matches!(self, Self::LocalSynthesis { .. })
    }
}

/// The composed video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoArtifact {
    pub video_url: String,
    /// Scene count times the per-scene length
    pub duration_secs: u32,
    /// Reuses the storyboard image
    pub thumbnail_url: String,
    pub mode: CompositionMode,
    pub simulated: bool,
    pub message: String,
}
