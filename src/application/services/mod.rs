//! Application services - Use case implementations
//!
//! The four gateway services each wrap one provider port and turn provider
//! failures into placeholder results. The wizard drives them through the
//! idea-to-video flow; the HTTP layer also exposes them directly.

pub mod composition_service;
pub mod gateway;
pub mod generation;
pub mod narration_service;
pub mod outline_service;
pub mod progress;
pub mod prompts;
pub mod storyboard_service;
pub mod wizard;

pub use composition_service::CompositionService;
pub use gateway::StoryGateway;
pub use generation::GatewayError;
pub use narration_service::NarrationService;
pub use outline_service::OutlineService;
pub use storyboard_service::StoryboardService;
pub use wizard::{WizardError, WizardService, WizardSnapshot};
