//! Domain entities - The story and everything generated for it

mod artifacts;
mod scene_step;
mod story;

pub use artifacts::{NarrationArtifact, StoryboardArtifact, VideoArtifact};
pub use scene_step::{renumber, Outline, SceneStep};
pub use story::Story;
