//! HTTP REST API routes

mod generation_routes;
mod wizard_routes;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Stateless generation routes
        .route("/api/generate-outline", post(generation_routes::generate_outline))
        .route("/api/regenerate-step", post(generation_routes::regenerate_step))
        .route("/api/generate-images", post(generation_routes::generate_images))
        .route("/api/generate-audio", post(generation_routes::generate_audio))
        .route("/api/compose-video", post(generation_routes::compose_video))
        .route("/api/generate-video", post(generation_routes::compose_video))
        // Wizard routes
        .route("/api/wizards", post(wizard_routes::create_wizard))
        .route("/api/wizards/{id}", get(wizard_routes::get_wizard))
        .route("/api/wizards/{id}", delete(wizard_routes::delete_wizard))
        .route("/api/wizards/{id}/idea", put(wizard_routes::set_idea))
        .route("/api/wizards/{id}/outline", post(wizard_routes::generate_outline))
        .route(
            "/api/wizards/{id}/steps/{index}",
            put(wizard_routes::edit_step),
        )
        .route(
            "/api/wizards/{id}/steps/{index}/regenerate",
            post(wizard_routes::regenerate_step),
        )
        .route(
            "/api/wizards/{id}/steps/{index}/select",
            post(wizard_routes::select_step),
        )
        .route(
            "/api/wizards/{id}/steps/{index}/commit",
            post(wizard_routes::commit_edit),
        )
        .route(
            "/api/wizards/{id}/storyboard",
            post(wizard_routes::generate_storyboard),
        )
        .route(
            "/api/wizards/{id}/storyboard/regenerate",
            post(wizard_routes::regenerate_storyboard),
        )
        .route(
            "/api/wizards/{id}/narration",
            post(wizard_routes::generate_narration),
        )
        .route(
            "/api/wizards/{id}/cinematic",
            post(wizard_routes::toggle_cinematic_mode),
        )
        .route("/api/wizards/{id}/video", post(wizard_routes::compose_video))
        .route("/api/wizards/{id}/save", post(wizard_routes::save))
        .route("/api/wizards/{id}/reset", post(wizard_routes::reset))
        .route("/api/wizards/{id}/back", post(wizard_routes::back))
        .route("/api/wizards/{id}/advance", post(wizard_routes::advance))
}
