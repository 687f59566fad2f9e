//! Rating service: validated upserts, statistics, and quick ratings.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::auth::require_user;
use crate::domain::ports::{AuthSession, RatingRepository, RatingRepositoryError, RewardLedger};
use crate::domain::{
    DimensionScore, Error, PromptRating, PromptRef, QuickRating, QuickRatingSummary, RatingDraft,
    RatingStats, RewardAction, RewardsService,
};

fn map_repository_error(error: RatingRepositoryError) -> Error {
    match error {
        RatingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rating repository unavailable: {message}"))
        }
        RatingRepositoryError::Query { message } => {
            Error::internal(format!("rating repository error: {message}"))
        }
        RatingRepositoryError::Decode { message } => {
            Error::internal(format!("rating repository returned malformed rows: {message}"))
        }
        RatingRepositoryError::Unauthorized { message } => {
            Error::unauthorized(format!("rating not permitted: {message}"))
        }
    }
}

/// Prompt rating service.
pub struct RatingService<R, L> {
    ratings: Arc<R>,
    rewards: RewardsService<L>,
    auth: Arc<dyn AuthSession>,
    clock: Arc<dyn Clock>,
}

impl<R, L> RatingService<R, L>
where
    R: RatingRepository,
    L: RewardLedger,
{
    pub fn new(
        ratings: Arc<R>,
        rewards: RewardsService<L>,
        auth: Arc<dyn AuthSession>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ratings,
            rewards,
            auth,
            clock,
        }
    }

    /// Validate and upsert the signed-in user's rating for a prompt.
    ///
    /// A second submission for the same prompt replaces the first and keeps
    /// its creation time. Only the first rating of a prompt earns points.
    pub async fn submit_rating(&self, draft: RatingDraft) -> Result<PromptRating, Error> {
        let user = require_user(self.auth.as_ref()).await?;
        let mut rating = PromptRating::from_draft(user.id.clone(), draft, self.clock.utc())
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let existing = self
            .ratings
            .find_rating(&user.id, &rating.prompt)
            .await
            .map_err(map_repository_error)?;
        if let Some(previous) = &existing {
            rating.created_at = previous.created_at;
        }

        let stored = self
            .ratings
            .upsert_rating(&rating)
            .await
            .map_err(map_repository_error)?;
        debug!(prompt = %stored.prompt, overall = stored.overall(), "rating saved");

        if existing.is_none()
            && let Err(error) = self
                .rewards
                .award(&user.id, RewardAction::PromptRated, Some(stored.prompt.to_string()))
                .await
        {
            warn!(error = %error, prompt = %stored.prompt, "rating saved but points not awarded");
        }
        Ok(stored)
    }

    /// The signed-in user's rating for a prompt, if any.
    pub async fn my_rating(&self, prompt: &PromptRef) -> Result<Option<PromptRating>, Error> {
        let user = require_user(self.auth.as_ref()).await?;
        self.ratings
            .find_rating(&user.id, prompt)
            .await
            .map_err(map_repository_error)
    }

    /// Aggregate statistics for a prompt. Anonymous callers may read.
    pub async fn rating_stats(&self, prompt: &PromptRef) -> Result<RatingStats, Error> {
        let scores = self
            .ratings
            .list_scores(prompt)
            .await
            .map_err(map_repository_error)?;
        Ok(RatingStats::aggregate(&scores))
    }

    /// Upsert a single-star rating for a prompt.
    pub async fn submit_quick_rating(
        &self,
        prompt: PromptRef,
        stars: u8,
    ) -> Result<QuickRating, Error> {
        let user = require_user(self.auth.as_ref()).await?;
        let stars = DimensionScore::new(stars).map_err(|err| Error::invalid_request(err.to_string()))?;
        let rating = QuickRating {
            user_id: user.id,
            prompt,
            stars,
            updated_at: self.clock.utc(),
        };
        self.ratings
            .upsert_quick_rating(&rating)
            .await
            .map_err(map_repository_error)?;
        Ok(rating)
    }

    /// Count and mean of quick ratings for a prompt.
    pub async fn quick_rating_summary(&self, prompt: &PromptRef) -> Result<QuickRatingSummary, Error> {
        let scores = self
            .ratings
            .list_quick_scores(prompt)
            .await
            .map_err(map_repository_error)?;
        Ok(QuickRatingSummary::from_scores(scores))
    }
}

#[cfg(test)]
#[path = "rating_service_tests.rs"]
mod tests;
