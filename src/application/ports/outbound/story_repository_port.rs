//! Story persistence port
//!
//! The wizard only needs to hand a finished story over and get an id back;
//! no storage schema is assumed.

use async_trait::async_trait;

use crate::domain::entities::Story;
use crate::domain::value_objects::StoryId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait StoryRepositoryPort: Send + Sync {
    async fn save(&self, story: &Story) -> Result<StoryId, RepositoryError>;

    async fn get(&self, id: StoryId) -> Result<Option<Story>, RepositoryError>;
}
