//! Domain layer - Core story model with no external dependencies
//!
//! This layer contains:
//! - Entities: Story, SceneStep, Outline, generated artifacts
//! - Value Objects: content classification, wizard stages, modes, ids, settings

pub mod entities;
pub mod value_objects;
