//! Story entity - the in-progress idea, outline and artifacts

use crate::domain::entities::{NarrationArtifact, Outline, SceneStep, StoryboardArtifact, VideoArtifact};
use crate::domain::value_objects::ContentClassification;

/// Everything produced so far for one idea
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Story {
    pub idea: String,
    pub classification: ContentClassification,
    pub steps: Vec<SceneStep>,
    pub storyboard: Option<StoryboardArtifact>,
    pub narration: Option<NarrationArtifact>,
    pub video: Option<VideoArtifact>,
}

impl Story {
    pub fn new(idea: impl Into<String>) -> Self {
        Self {
            idea: idea.into(),
            ..Self::default()
        }
    }

    pub fn has_outline(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Install a freshly generated outline
    pub fn apply_outline(&mut self, outline: Outline) {
        self.classification = outline.classification;
        self.steps = outline.steps;
    }

    /// Replace one step in place, keeping its sequence number
    ///
    /// Returns false when the index is out of range.
    pub fn replace_step(&mut self, index: usize, mut step: SceneStep) -> bool {
        match self.steps.get_mut(index) {
            Some(slot) => {
                step.number = index as u32 + 1;
                *slot = step;
                true
            }
            None => false,
        }
    }

    /// Full narration script, one paragraph per scene
    pub fn narration_script(&self) -> String {
        self.steps
            .iter()
            .map(SceneStep::narration_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Attach a composed video; refused without a storyboard
    pub fn attach_video(&mut self, video: VideoArtifact) -> bool {
        if self.storyboard.is_none() {
            return false;
        }
        self.video = Some(video);
        true
    }
}
