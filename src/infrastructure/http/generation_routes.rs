//! Generation API routes - one stateless call per gateway service

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::dto::{
    NarrationRequestDto, NarrationResponseDto, OutlineRequestDto, OutlineResponseDto,
    RegenerateStepRequestDto, RegenerateStepResponseDto, StoryboardRequestDto,
    StoryboardResponseDto, VideoRequestDto, VideoResponseDto,
};
use crate::application::services::GatewayError;
use crate::domain::entities::SceneStep;
use crate::domain::value_objects::{CompositionMode, ContentClassification};
use crate::infrastructure::state::AppState;

/// Classify an idea and expand it into scenes
pub async fn generate_outline(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OutlineRequestDto>,
) -> Result<Json<OutlineResponseDto>, (StatusCode, String)> {
    let outcome = state
        .gateway
        .outline
        .generate_outline(&request.prompt)
        .await
        .map_err(gateway_error)?;

    Ok(Json(OutlineResponseDto::from(outcome)))
}

/// Rewrite a single scene of an existing outline
pub async fn regenerate_step(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegenerateStepRequestDto>,
) -> Result<Json<RegenerateStepResponseDto>, (StatusCode, String)> {
    let index = request
        .step_number
        .checked_sub(1)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Step numbers start at 1".to_string()))?
        as usize;
    let steps: Vec<SceneStep> = request.current_steps.into_iter().map(SceneStep::from).collect();

    let outcome = state
        .gateway
        .outline
        .regenerate_step(&request.prompt, index, &steps)
        .await
        .map_err(gateway_error)?;

    Ok(Json(RegenerateStepResponseDto::from(outcome)))
}

/// Draw the storyboard page
pub async fn generate_images(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StoryboardRequestDto>,
) -> Result<Json<StoryboardResponseDto>, (StatusCode, String)> {
    let steps = request.steps().map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let classification = request
        .content_type
        .as_deref()
        .map(ContentClassification::from_wire)
        .unwrap_or_default();

    let outcome = state
        .gateway
        .storyboard
        .generate(&steps, classification)
        .await
        .map_err(gateway_error)?;

    Ok(Json(StoryboardResponseDto::from(outcome.value())))
}

/// Synthesize the narration, or tell the client to speak it locally
pub async fn generate_audio(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NarrationRequestDto>,
) -> Result<Json<NarrationResponseDto>, (StatusCode, String)> {
    let outcome = state
        .gateway
        .narration
        .narrate(&request.text, request.voice_id.as_deref())
        .await
        .map_err(gateway_error)?;

    Ok(Json(NarrationResponseDto::from(outcome.value())))
}

/// Compose the final video
pub async fn compose_video(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VideoRequestDto>,
) -> Result<Json<VideoResponseDto>, (StatusCode, String)> {
    let storyboard_image = request.storyboard_image.unwrap_or_default();

    let outcome = state
        .gateway
        .composition
        .compose(
            &storyboard_image,
            request.audio_url.as_deref(),
            request.story_steps.len(),
            CompositionMode::from_cinematic_flag(request.use_cinematic_mode),
        )
        .await
        .map_err(gateway_error)?;

    Ok(Json(VideoResponseDto::from(outcome.value())))
}

fn gateway_error(error: GatewayError) -> (StatusCode, String) {
    let status = match &error {
        GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        GatewayError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.to_string())
}
