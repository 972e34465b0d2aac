use serde::{Deserialize, Serialize};

use crate::application::services::generation::Generated;
use crate::application::services::narration_service::{LOCAL_SYNTHESIS_MESSAGE, SYNTHESIZED_MESSAGE};
use crate::domain::entities::{NarrationArtifact, Outline, SceneStep, StoryboardArtifact, VideoArtifact};

/// One scene as it travels over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneStepDto {
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_focus: Option<String>,
}

impl From<&SceneStep> for SceneStepDto {
    fn from(step: &SceneStep) -> Self {
        Self {
            number: step.number,
            title: step.title.clone(),
            description: step.description.clone(),
            character_focus: step.character_focus.clone(),
        }
    }
}

impl From<SceneStepDto> for SceneStep {
    fn from(dto: SceneStepDto) -> Self {
        Self {
            number: dto.number,
            title: dto.title,
            description: dto.description,
            character_focus: dto.character_focus.filter(|c| !c.trim().is_empty()),
        }
    }
}

// =============================================================================
// Outline
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct OutlineRequestDto {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineResponseDto {
    pub content_type: String,
    pub steps: Vec<SceneStepDto>,
    /// The steps are the built-in placeholder outline
    pub fallback: bool,
}

impl From<Generated<Outline>> for OutlineResponseDto {
    fn from(outcome: Generated<Outline>) -> Self {
        let fallback = outcome.is_fallback();
        let outline = outcome.into_inner();
        Self {
            content_type: outline.classification.as_wire().to_string(),
            steps: outline.steps.iter().map(SceneStepDto::from).collect(),
            fallback,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateStepRequestDto {
    #[serde(default)]
    pub prompt: String,
    /// 1-based
    pub step_number: u32,
    #[serde(default)]
    pub current_steps: Vec<SceneStepDto>,
}

#[derive(Debug, Serialize)]
pub struct RegenerateStepResponseDto {
    pub step: SceneStepDto,
    pub fallback: bool,
}

impl From<Generated<SceneStep>> for RegenerateStepResponseDto {
    fn from(outcome: Generated<SceneStep>) -> Self {
        Self {
            fallback: outcome.is_fallback(),
            step: SceneStepDto::from(outcome.value()),
        }
    }
}

// =============================================================================
// Storyboard
// =============================================================================

/// `storySteps` is kept loose so a missing or non-array value can be
/// reported as a validation error rather than a body rejection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardRequestDto {
    #[serde(default)]
    pub story_steps: Option<serde_json::Value>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl StoryboardRequestDto {
    pub fn steps(&self) -> Result<Vec<SceneStep>, String> {
        match &self.story_steps {
            Some(value @ serde_json::Value::Array(_)) => {
                let steps: Vec<SceneStepDto> = serde_json::from_value(value.clone())
                    .map_err(|e| format!("Story steps are malformed: {}", e))?;
                Ok(steps.into_iter().map(SceneStep::from).collect())
            }
            _ => Err("Story steps are required".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardResponseDto {
    pub image: String,
    pub quota_exceeded: bool,
    pub placeholder: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&StoryboardArtifact> for StoryboardResponseDto {
    fn from(artifact: &StoryboardArtifact) -> Self {
        Self {
            image: artifact.image.clone(),
            quota_exceeded: artifact.quota_exceeded,
            placeholder: artifact.placeholder,
            message: artifact.message.clone(),
        }
    }
}

// =============================================================================
// Narration
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationRequestDto {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub voice_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationResponseDto {
    pub audio_url: Option<String>,
    pub duration: u32,
    #[serde(rename = "useBrowserTTS")]
    pub use_browser_tts: bool,
    pub message: String,
}

impl From<&NarrationArtifact> for NarrationResponseDto {
    fn from(artifact: &NarrationArtifact) -> Self {
        let message = if artifact.uses_local_synthesis() {
            LOCAL_SYNTHESIS_MESSAGE
        } else {
            SYNTHESIZED_MESSAGE
        };
        Self {
            audio_url: artifact.audio_url().map(str::to_string),
            duration: artifact.duration_secs(),
            use_browser_tts: artifact.uses_local_synthesis(),
            message: message.to_string(),
        }
    }
}

// =============================================================================
// Video
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequestDto {
    #[serde(default)]
    pub storyboard_image: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub story_steps: Vec<SceneStepDto>,
    #[serde(default)]
    pub use_cinematic_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponseDto {
    pub video_url: String,
    pub duration: u32,
    pub thumbnail_url: String,
    pub cinematic_mode: bool,
    pub simulated: bool,
    pub message: String,
}

impl From<&VideoArtifact> for VideoResponseDto {
    fn from(video: &VideoArtifact) -> Self {
        Self {
            video_url: video.video_url.clone(),
            duration: video.duration_secs,
            thumbnail_url: video.thumbnail_url.clone(),
            cinematic_mode: video.mode.is_cinematic(),
            simulated: video.simulated,
            message: video.message.clone(),
        }
    }
}
