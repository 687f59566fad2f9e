//! REST-backed `RatingRepository` over `prompt_ratings` and `quick_ratings`.

use async_trait::async_trait;
use serde::de::IgnoredAny;

use super::client::{RestClient, RestError};
use super::dto::{QuickRatingRow, RatingRow, ScoreRow, StarRow};
use super::error_mapping::map_basic_rest_error;
use super::query::TableQuery;
use crate::domain::ports::{RatingRepository, RatingRepositoryError};
use crate::domain::{DimensionScore, DimensionScores, PromptRating, PromptRef, QuickRating, UserId};

const PROMPT_RATINGS: &str = "prompt_ratings";
const QUICK_RATINGS: &str = "quick_ratings";
const RATING_CONFLICT_KEY: &str = "user_id,prompt_id,prompt_type";

#[derive(Clone)]
pub struct RestRatingRepository {
    client: RestClient,
}

impl RestRatingRepository {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

fn map_rest_error(error: RestError) -> RatingRepositoryError {
    if let RestError::Unauthorized { message } = error {
        return RatingRepositoryError::unauthorized(message);
    }
    map_basic_rest_error(
        error,
        RatingRepositoryError::connection,
        RatingRepositoryError::query,
        RatingRepositoryError::decode,
    )
}

fn for_prompt(table: &'static str, prompt: &PromptRef) -> TableQuery {
    TableQuery::table(table)
        .eq("prompt_id", prompt.id())
        .eq("prompt_type", prompt.kind())
}

#[async_trait]
impl RatingRepository for RestRatingRepository {
    async fn find_rating(
        &self,
        user_id: &UserId,
        prompt: &PromptRef,
    ) -> Result<Option<PromptRating>, RatingRepositoryError> {
        let query = for_prompt(PROMPT_RATINGS, prompt)
            .select("*")
            .eq("user_id", user_id);
        let rows: Vec<RatingRow> = self.client.select(&query).await.map_err(map_rest_error)?;
        rows.into_iter()
            .next()
            .map(RatingRow::into_domain)
            .transpose()
            .map_err(RatingRepositoryError::decode)
    }

    async fn upsert_rating(
        &self,
        rating: &PromptRating,
    ) -> Result<PromptRating, RatingRepositoryError> {
        let row = RatingRow::from_domain(rating);
        let stored: Vec<RatingRow> = self
            .client
            .upsert(PROMPT_RATINGS, RATING_CONFLICT_KEY, &[row])
            .await
            .map_err(map_rest_error)?;
        stored
            .into_iter()
            .next()
            .ok_or_else(|| RatingRepositoryError::decode("upsert returned no rows"))?
            .into_domain()
            .map_err(RatingRepositoryError::decode)
    }

    async fn list_scores(
        &self,
        prompt: &PromptRef,
    ) -> Result<Vec<DimensionScores>, RatingRepositoryError> {
        let query = for_prompt(PROMPT_RATINGS, prompt).select("effectiveness,clarity,time_value");
        let rows: Vec<ScoreRow> = self.client.select(&query).await.map_err(map_rest_error)?;
        rows.into_iter()
            .map(ScoreRow::into_domain)
            .collect::<Result<_, _>>()
            .map_err(RatingRepositoryError::decode)
    }

    async fn upsert_quick_rating(&self, rating: &QuickRating) -> Result<(), RatingRepositoryError> {
        let row = QuickRatingRow::from(rating);
        let _stored: Vec<IgnoredAny> = self
            .client
            .upsert(QUICK_RATINGS, RATING_CONFLICT_KEY, &[row])
            .await
            .map_err(map_rest_error)?;
        Ok(())
    }

    async fn list_quick_scores(
        &self,
        prompt: &PromptRef,
    ) -> Result<Vec<DimensionScore>, RatingRepositoryError> {
        let query = for_prompt(QUICK_RATINGS, prompt).select("rating");
        let rows: Vec<StarRow> = self.client.select(&query).await.map_err(map_rest_error)?;
        rows.into_iter()
            .map(StarRow::into_domain)
            .collect::<Result<_, _>>()
            .map_err(RatingRepositoryError::decode)
    }
}
