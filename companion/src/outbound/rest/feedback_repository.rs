//! REST-backed `FeedbackRepository` over `prompt_feedback`.

use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde_json::json;
use uuid::Uuid;

use super::client::{RestClient, RestError};
use super::dto::{FeedbackRow, NewFeedbackRow};
use super::error_mapping::map_basic_rest_error;
use super::query::{Direction, TableQuery};
use crate::domain::ports::{FeedbackRepository, FeedbackRepositoryError};
use crate::domain::{Feedback, NewFeedback, PromptRef, UserId};

const PROMPT_FEEDBACK: &str = "prompt_feedback";
const INCREMENT_HELPFUL: &str = "increment_feedback_helpful";

#[derive(Clone)]
pub struct RestFeedbackRepository {
    client: RestClient,
}

impl RestFeedbackRepository {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

fn map_rest_error(error: RestError) -> FeedbackRepositoryError {
    if let RestError::Unauthorized { message } = error {
        return FeedbackRepositoryError::unauthorized(message);
    }
    map_basic_rest_error(
        error,
        FeedbackRepositoryError::connection,
        FeedbackRepositoryError::query,
        FeedbackRepositoryError::decode,
    )
}

#[async_trait]
impl FeedbackRepository for RestFeedbackRepository {
    async fn insert(&self, feedback: &NewFeedback) -> Result<Feedback, FeedbackRepositoryError> {
        let rows: Vec<FeedbackRow> = self
            .client
            .insert(PROMPT_FEEDBACK, &[NewFeedbackRow::from(feedback)])
            .await
            .map_err(map_rest_error)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| FeedbackRepositoryError::decode("insert returned no rows"))?
            .into_domain()
            .map_err(FeedbackRepositoryError::decode)
    }

    async fn list_for_prompt(
        &self,
        prompt: &PromptRef,
    ) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
        let query = TableQuery::table(PROMPT_FEEDBACK)
            .select("*")
            .eq("prompt_id", prompt.id())
            .eq("prompt_type", prompt.kind())
            .order("helpful_count", Direction::Desc)
            .order("created_at", Direction::Desc);
        let rows: Vec<FeedbackRow> = self.client.select(&query).await.map_err(map_rest_error)?;
        rows.into_iter()
            .map(FeedbackRow::into_domain)
            .collect::<Result<_, _>>()
            .map_err(FeedbackRepositoryError::decode)
    }

    async fn mark_helpful(&self, feedback_id: Uuid) -> Result<(), FeedbackRepositoryError> {
        self.client
            .rpc(INCREMENT_HELPFUL, &json!({ "feedback_id": feedback_id }))
            .await
            .map_err(map_rest_error)
    }

    async fn delete(
        &self,
        user_id: &UserId,
        feedback_id: Uuid,
    ) -> Result<bool, FeedbackRepositoryError> {
        let query = TableQuery::table(PROMPT_FEEDBACK)
            .eq("id", feedback_id)
            .eq("user_id", user_id);
        let removed: Vec<IgnoredAny> = self.client.delete(&query).await.map_err(map_rest_error)?;
        Ok(!removed.is_empty())
    }
}
