//! Wizard API routes - the idea-to-video flow hosted on the server

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::dto::{
    EditStepRequestDto, SetIdeaRequestDto, WizardNarrationRequestDto, WizardSnapshotDto,
};
use crate::application::services::{WizardError, WizardSnapshot};
use crate::domain::value_objects::WizardId;
use crate::infrastructure::state::AppState;

type WizardResult = Result<Json<WizardSnapshotDto>, (StatusCode, String)>;

fn respond(result: Result<WizardSnapshot, WizardError>) -> WizardResult {
    result
        .map(|snapshot| Json(WizardSnapshotDto::from(&snapshot)))
        .map_err(wizard_error)
}

fn wizard_error(error: WizardError) -> (StatusCode, String) {
    let status = match &error {
        WizardError::NotFound(_) => StatusCode::NOT_FOUND,
        WizardError::EmptyIdea
        | WizardError::StepOutOfRange { .. }
        | WizardError::Rejected(_) => StatusCode::BAD_REQUEST,
        WizardError::OperationInProgress(_)
        | WizardError::IdeaLocked
        | WizardError::NoOutline
        | WizardError::NotSelected(_)
        | WizardError::NoStoryboard
        | WizardError::NoNarration
        | WizardError::InvalidTransition { .. } => StatusCode::CONFLICT,
        WizardError::SaveFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.to_string())
}

/// Start a new wizard session
pub async fn create_wizard(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<WizardSnapshotDto>) {
    let snapshot = state.wizard.create().await;
    (StatusCode::CREATED, Json(WizardSnapshotDto::from(&snapshot)))
}

pub async fn get_wizard(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> WizardResult {
    respond(state.wizard.snapshot(WizardId::from(id)).await)
}

pub async fn delete_wizard(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> StatusCode {
    if state.wizard.remove(WizardId::from(id)).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

pub async fn set_idea(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetIdeaRequestDto>,
) -> WizardResult {
    respond(state.wizard.set_idea(WizardId::from(id), request.idea).await)
}

pub async fn generate_outline(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> WizardResult {
    respond(state.wizard.generate_outline(WizardId::from(id)).await)
}

pub async fn regenerate_step(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> WizardResult {
    respond(state.wizard.regenerate_step(WizardId::from(id), index).await)
}

/// Open a step for editing; any unsaved edit of another step is dropped
pub async fn select_step(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> WizardResult {
    let id = WizardId::from(id);
    state.wizard.select_step(id, index).await.map_err(wizard_error)?;
    respond(state.wizard.snapshot(id).await)
}

pub async fn edit_step(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(request): Json<EditStepRequestDto>,
) -> WizardResult {
    respond(
        state
            .wizard
            .edit_step(WizardId::from(id), index, request.text)
            .await,
    )
}

pub async fn commit_edit(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> WizardResult {
    respond(state.wizard.commit_edit(WizardId::from(id), index).await)
}

pub async fn generate_storyboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> WizardResult {
    respond(state.wizard.generate_storyboard(WizardId::from(id)).await)
}

pub async fn regenerate_storyboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> WizardResult {
    respond(state.wizard.regenerate_storyboard(WizardId::from(id)).await)
}

/// The body is optional; `{"voiceId": "..."}` picks a voice
pub async fn generate_narration(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> WizardResult {
    let request = if body.is_empty() {
        WizardNarrationRequestDto::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    };
    respond(
        state
            .wizard
            .generate_narration(WizardId::from(id), request.voice_id)
            .await,
    )
}

pub async fn toggle_cinematic_mode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> WizardResult {
    respond(state.wizard.toggle_cinematic_mode(WizardId::from(id)).await)
}

pub async fn compose_video(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> WizardResult {
    respond(state.wizard.compose_video(WizardId::from(id)).await)
}

pub async fn save(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> WizardResult {
    respond(state.wizard.save(WizardId::from(id)).await)
}

pub async fn reset(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> WizardResult {
    respond(state.wizard.reset(WizardId::from(id)).await)
}

pub async fn back(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> WizardResult {
    respond(state.wizard.back(WizardId::from(id)).await)
}

pub async fn advance(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> WizardResult {
    respond(state.wizard.advance(WizardId::from(id)).await)
}
