use serde::{Deserialize, Serialize};

use crate::application::dto::generation::{
    NarrationResponseDto, SceneStepDto, StoryboardResponseDto, VideoResponseDto,
};
use crate::application::services::wizard::{StepSelection, WizardSnapshot};

#[derive(Debug, Deserialize)]
pub struct SetIdeaRequestDto {
    pub idea: String,
}

#[derive(Debug, Deserialize)]
pub struct EditStepRequestDto {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardNarrationRequestDto {
    #[serde(default)]
    pub voice_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSelectionDto {
    pub index: usize,
    pub buffer: String,
}

impl From<&StepSelection> for StepSelectionDto {
    fn from(selection: &StepSelection) -> Self {
        Self {
            index: selection.index,
            buffer: selection.buffer.clone(),
        }
    }
}

/// Everything a client needs to render the wizard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshotDto {
    pub id: String,
    pub stage: String,
    pub idea: String,
    pub content_type: String,
    pub steps: Vec<SceneStepDto>,
    pub selection: Option<StepSelectionDto>,
    pub storyboard: Option<StoryboardResponseDto>,
    pub narration: Option<NarrationResponseDto>,
    pub video: Option<VideoResponseDto>,
    pub cinematic_mode: bool,
    pub progress: u8,
    pub in_flight: Vec<String>,
    pub status_message: Option<String>,
    pub quota_warning: Option<String>,
    pub saved_story_id: Option<String>,
}

impl From<&WizardSnapshot> for WizardSnapshotDto {
    fn from(snapshot: &WizardSnapshot) -> Self {
        let story = &snapshot.story;
        Self {
            id: snapshot.id.to_string(),
            stage: snapshot.stage.as_str().to_string(),
            idea: story.idea.clone(),
            content_type: story.classification.as_wire().to_string(),
            steps: story.steps.iter().map(SceneStepDto::from).collect(),
            selection: snapshot.selection.as_ref().map(StepSelectionDto::from),
            storyboard: story.storyboard.as_ref().map(StoryboardResponseDto::from),
            narration: story.narration.as_ref().map(NarrationResponseDto::from),
            video: story.video.as_ref().map(VideoResponseDto::from),
            cinematic_mode: snapshot.cinematic_mode,
            progress: snapshot.progress,
            in_flight: snapshot
                .in_flight
                .iter()
                .map(|op| op.as_str().to_string())
                .collect(),
            status_message: snapshot.status_message.clone(),
            quota_warning: snapshot.quota_warning.clone(),
            saved_story_id: snapshot.saved_as.map(|id| id.to_string()),
        }
    }
}
