//! Prompt building functions for the outline and storyboard models

mod outline;
mod storyboard;

pub use outline::{build_outline_prompt, build_regenerate_step_prompt};
pub use storyboard::{build_storyboard_prompt, style_guide};
