//! Port for prompt ratings and quick ratings.

use async_trait::async_trait;

use crate::domain::{DimensionScore, DimensionScores, PromptRating, PromptRef, QuickRating, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rating persistence adapters.
    pub enum RatingRepositoryError {
        /// Backend could not be reached.
        Connection { message: String } => "rating repository connection failed: {message}",
        /// Backend rejected or failed the query.
        Query { message: String } => "rating repository query failed: {message}",
        /// Stored rows did not decode.
        Decode { message: String } => "rating repository decode failed: {message}",
        /// Row-level security refused the caller.
        Unauthorized { message: String } => "rating repository unauthorised: {message}",
    }
}

/// Port for reading and upserting ratings.
///
/// Both rating kinds are keyed by (user, prompt id, prompt kind); upserting
/// the same key replaces the stored row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// The caller's existing rating for a prompt, if any.
    async fn find_rating(
        &self,
        user_id: &UserId,
        prompt: &PromptRef,
    ) -> Result<Option<PromptRating>, RatingRepositoryError>;

    /// Insert or replace a rating and return the stored row.
    async fn upsert_rating(
        &self,
        rating: &PromptRating,
    ) -> Result<PromptRating, RatingRepositoryError>;

    /// Dimension scores of every rating for a prompt.
    async fn list_scores(
        &self,
        prompt: &PromptRef,
    ) -> Result<Vec<DimensionScores>, RatingRepositoryError>;

    /// Insert or replace a quick rating.
    async fn upsert_quick_rating(&self, rating: &QuickRating) -> Result<(), RatingRepositoryError>;

    /// Star scores of every quick rating for a prompt.
    async fn list_quick_scores(
        &self,
        prompt: &PromptRef,
    ) -> Result<Vec<DimensionScore>, RatingRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRatingRepository;

#[async_trait]
impl RatingRepository for FixtureRatingRepository {
    async fn find_rating(
        &self,
        _user_id: &UserId,
        _prompt: &PromptRef,
    ) -> Result<Option<PromptRating>, RatingRepositoryError> {
        Ok(None)
    }

    async fn upsert_rating(
        &self,
        rating: &PromptRating,
    ) -> Result<PromptRating, RatingRepositoryError> {
        Ok(rating.clone())
    }

    async fn list_scores(
        &self,
        _prompt: &PromptRef,
    ) -> Result<Vec<DimensionScores>, RatingRepositoryError> {
        Ok(Vec::new())
    }

    async fn upsert_quick_rating(&self, _rating: &QuickRating) -> Result<(), RatingRepositoryError> {
        Ok(())
    }

    async fn list_quick_scores(
        &self,
        _prompt: &PromptRef,
    ) -> Result<Vec<DimensionScore>, RatingRepositoryError> {
        Ok(Vec::new())
    }
}
