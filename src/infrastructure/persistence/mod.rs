//! Persistence adapters

mod in_memory_story_repository;

pub use in_memory_story_repository::InMemoryStoryRepository;
