//! StoryReel Engine - Backend API turning a short idea into a narrated video
//!
//! The Engine is the backend server that:
//! - Classifies an idea and expands it into a scene outline (Gemini)
//! - Draws every scene onto one storyboard page (Imagen)
//! - Narrates the outline (ElevenLabs, or local synthesis on the client)
//! - Composes the storyboard and narration into a video
//! - Hosts the idea-to-video wizard so a thin client can drive it

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyreel_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting StoryReel Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Gemini: {} (key set: {})", config.gemini_model, config.gemini_api_key.is_some());
    tracing::info!("  Imagen: {} (key set: {})", config.imagen_model, config.imagen_api_key.is_some());
    tracing::info!("  ElevenLabs key set: {}", config.elevenlabs_api_key.is_some());
    tracing::info!("  Story mode: {:?}", config.story_mode);

    // Initialize application state
    let state = Arc::new(AppState::new(&config));
    tracing::info!("Application state initialized");

    // Sweep worker (drops wizards nobody has used for a while)
    let sweep_worker = {
        let state = state.clone();
        tokio::spawn(async move {
            let idle = state.settings.wizard_idle_timeout();
            let interval = state.settings.wizard_sweep_interval();
            tracing::info!("Starting wizard sweep worker (idle timeout {:?})", idle);
            loop {
                tokio::time::sleep(interval).await;
                match chrono::Duration::from_std(idle) {
                    Ok(idle) => {
                        state.wizard.evict_idle(chrono::Utc::now() - idle).await;
                    }
                    Err(e) => tracing::error!("Invalid wizard idle timeout: {}", e),
                }
            }
        })
    };

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    let server = axum::serve(listener, app);

    // Wait for shutdown signal (Ctrl+C)
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping workers...");
            sweep_worker.abort();
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
