//! Success story service.

use std::sync::Arc;

use tracing::warn;

use crate::domain::auth::require_user;
use crate::domain::ports::{AuthSession, RewardLedger, StoryRepository, StoryRepositoryError};
use crate::domain::{Error, NewStory, RewardAction, RewardsService, SuccessStory};

fn map_repository_error(error: StoryRepositoryError) -> Error {
    match error {
        StoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("story repository unavailable: {message}"))
        }
        StoryRepositoryError::Query { message } => {
            Error::internal(format!("story repository error: {message}"))
        }
        StoryRepositoryError::Decode { message } => {
            Error::internal(format!("story repository returned malformed rows: {message}"))
        }
        StoryRepositoryError::Unauthorized { message } => {
            Error::unauthorized(format!("story not permitted: {message}"))
        }
    }
}

pub struct StoryService<S, L> {
    stories: Arc<S>,
    rewards: RewardsService<L>,
    auth: Arc<dyn AuthSession>,
}

impl<S, L> StoryService<S, L>
where
    S: StoryRepository,
    L: RewardLedger,
{
    pub fn new(stories: Arc<S>, rewards: RewardsService<L>, auth: Arc<dyn AuthSession>) -> Self {
        Self {
            stories,
            rewards,
            auth,
        }
    }

    /// Submit a story for moderation and award points.
    pub async fn submit(
        &self,
        title: &str,
        body: &str,
        chapter_number: Option<u16>,
    ) -> Result<SuccessStory, Error> {
        let user = require_user(self.auth.as_ref()).await?;
        let story = NewStory::new(user.id.clone(), title, body, chapter_number)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let stored = self
            .stories
            .insert(&story)
            .await
            .map_err(map_repository_error)?;

        if let Err(error) = self
            .rewards
            .award(&user.id, RewardAction::StoryShared, Some(stored.id.to_string()))
            .await
        {
            warn!(error = %error, story_id = %stored.id, "story saved but points not awarded");
        }
        Ok(stored)
    }

    /// Approved stories, newest first.
    pub async fn list_approved(&self) -> Result<Vec<SuccessStory>, Error> {
        let mut stories = self
            .stories
            .list_approved()
            .await
            .map_err(map_repository_error)?;
        stories.retain(|story| story.approved);
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stories)
    }
}
