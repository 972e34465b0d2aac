//! In-memory story repository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::application::ports::outbound::{RepositoryError, StoryRepositoryPort};
use crate::domain::entities::Story;
use crate::domain::value_objects::StoryId;

#[derive(Debug, Clone)]
struct StoredStory {
    story: Story,
    saved_at: DateTime<Utc>,
}

/// Keeps saved stories for the lifetime of the process
#[derive(Debug, Default)]
pub struct InMemoryStoryRepository {
    stories: RwLock<HashMap<StoryId, StoredStory>>,
}

impl InMemoryStoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.stories.read().await.len()
    }

    pub async fn saved_at(&self, id: StoryId) -> Option<DateTime<Utc>> {
        self.stories.read().await.get(&id).map(|stored| stored.saved_at)
    }
}

#[async_trait]
impl StoryRepositoryPort for InMemoryStoryRepository {
    async fn save(&self, story: &Story) -> Result<StoryId, RepositoryError> {
        let id = StoryId::new();
        let stored = StoredStory {
            story: story.clone(),
            saved_at: Utc::now(),
        };
        self.stories.write().await.insert(id, stored);
        tracing::info!("Saved story {} ({} scenes)", id, story.steps.len());
        Ok(id)
    }

    async fn get(&self, id: StoryId) -> Result<Option<Story>, RepositoryError> {
        Ok(self
            .stories
            .read()
            .await
            .get(&id)
            .map(|stored| stored.story.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SceneStep;

    #[tokio::test]
    async fn test_save_then_get() {
        let repository = InMemoryStoryRepository::new();
        let mut story = Story::new("A robot who learns to paint in space");
        story.steps = vec![SceneStep::new(1, "Rust and Stars", "A robot drifts.")];

        let id = repository.save(&story).await.unwrap();

        assert_eq!(repository.get(id).await.unwrap(), Some(story));
        assert_eq!(repository.len().await, 1);
        assert!(repository.saved_at(id).await.is_some());
    }

    #[tokio::test]
    async fn test_each_save_gets_new_id() {
        let repository = InMemoryStoryRepository::new();
        let story = Story::new("Idea");

        let first = repository.save(&story).await.unwrap();
        let second = repository.save(&story).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(repository.get(StoryId::new()).await.unwrap(), None);
    }
}
