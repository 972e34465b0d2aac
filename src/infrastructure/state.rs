//! Shared application state

use std::sync::Arc;

use crate::application::ports::outbound::StoryRepositoryPort;
use crate::application::services::{
    CompositionService, NarrationService, OutlineService, StoryGateway, StoryboardService,
    WizardService,
};
use crate::domain::value_objects::AppSettings;
use crate::infrastructure::composer::SimulatedComposer;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::elevenlabs::ElevenLabsClient;
use crate::infrastructure::gemini::GeminiClient;
use crate::infrastructure::imagen::ImagenClient;
use crate::infrastructure::persistence::InMemoryStoryRepository;

/// Shared application state
pub struct AppState {
    /// Stateless generation endpoints
    pub gateway: StoryGateway,
    /// Server-hosted wizard sessions
    pub wizard: WizardService,
    pub settings: AppSettings,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let settings = config.settings.clone();

        // Initialize provider clients
        let gemini = GeminiClient::new(
            &config.gemini_base_url,
            &config.gemini_model,
            config.gemini_api_key.clone(),
        );
        let imagen = ImagenClient::new(
            &config.imagen_base_url,
            &config.google_cloud_project_id,
            &config.google_cloud_location,
            &config.imagen_model,
            config.imagen_api_key.clone(),
        );
        let elevenlabs = ElevenLabsClient::new(
            &config.elevenlabs_base_url,
            &config.elevenlabs_model,
            &config.elevenlabs_default_voice,
            config.elevenlabs_api_key.clone(),
        );
        let composer = SimulatedComposer::new(settings.composition_latency());

        // Initialize application services
        let gateway = StoryGateway::new(
            OutlineService::new(Arc::new(gemini), config.story_mode, settings.min_scene_count),
            StoryboardService::new(Arc::new(imagen), config.story_mode),
            NarrationService::new(Arc::new(elevenlabs), settings.narration_duration_secs),
            CompositionService::new(Arc::new(composer), settings.seconds_per_scene),
        );

        Self::with_gateway(gateway, Arc::new(InMemoryStoryRepository::new()), settings)
    }

    pub fn with_gateway(
        gateway: StoryGateway,
        repository: Arc<dyn StoryRepositoryPort>,
        settings: AppSettings,
    ) -> Self {
        let wizard = WizardService::new(gateway.clone(), repository, settings.clone());
        Self {
            gateway,
            wizard,
            settings,
        }
    }
}
