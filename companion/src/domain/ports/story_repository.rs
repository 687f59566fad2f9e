//! Port for success stories.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewStory, SuccessStory};

use super::define_port_error;

define_port_error! {
    /// Errors raised by story persistence adapters.
    pub enum StoryRepositoryError {
        /// Backend could not be reached.
        Connection { message: String } => "story repository connection failed: {message}",
        /// Backend rejected or failed the query.
        Query { message: String } => "story repository query failed: {message}",
        /// Stored rows did not decode.
        Decode { message: String } => "story repository decode failed: {message}",
        /// Row-level security refused the caller.
        Unauthorized { message: String } => "story repository unauthorised: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Store a story pending moderation.
    async fn insert(&self, story: &NewStory) -> Result<SuccessStory, StoryRepositoryError>;

    /// Approved stories, newest first.
    async fn list_approved(&self) -> Result<Vec<SuccessStory>, StoryRepositoryError>;
}

/// Fixture implementation with no approved stories.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStoryRepository;

#[async_trait]
impl StoryRepository for FixtureStoryRepository {
    async fn insert(&self, story: &NewStory) -> Result<SuccessStory, StoryRepositoryError> {
        Ok(SuccessStory {
            id: Uuid::new_v4(),
            user_id: story.user_id.clone(),
            title: story.title.clone(),
            body: story.body.clone(),
            chapter_number: story.chapter_number,
            approved: false,
            created_at: chrono::Utc::now(),
        })
    }

    async fn list_approved(&self) -> Result<Vec<SuccessStory>, StoryRepositoryError> {
        Ok(Vec::new())
    }
}
