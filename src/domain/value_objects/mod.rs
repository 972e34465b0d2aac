//! Value objects - Immutable objects defined by their attributes

mod classification;
mod ids;
mod settings;
mod story_mode;
mod wizard_stage;

pub use classification::ContentClassification;
pub use ids::*;
pub use settings::AppSettings;
pub use story_mode::{CompositionMode, StoryMode};
pub use wizard_stage::WizardStage;
