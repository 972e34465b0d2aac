//! Outbound ports - Interfaces that the application requires from external systems

mod composer_port;
mod image_port;
mod llm_port;
mod speech_port;
mod story_repository_port;

pub use composer_port::{ComposedVideo, ComposerError, CompositionJob, VideoComposerPort};
pub use image_port::{GeneratedImage, ImageGenerationError, ImageGenerationPort, ImageRequest};
pub use llm_port::{LlmError, LlmPort, LlmRequest, LlmResponse};
pub use speech_port::{SpeechRequest, SpeechSynthesisError, SpeechSynthesisPort, SynthesizedSpeech};
pub use story_repository_port::{RepositoryError, StoryRepositoryPort};
