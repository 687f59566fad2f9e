//! REST-backed `ExerciseResponseRepository` over `exercise_responses`.

use async_trait::async_trait;
use serde::de::IgnoredAny;

use super::client::{RestClient, RestError};
use super::dto::ExerciseResponseRow;
use super::error_mapping::map_basic_rest_error;
use super::query::TableQuery;
use crate::domain::ports::{ExerciseResponseRepository, ExerciseResponseRepositoryError};
use crate::domain::{ExerciseResponse, UserId};

const EXERCISE_RESPONSES: &str = "exercise_responses";
const RESPONSE_CONFLICT_KEY: &str = "user_id,exercise_id";

#[derive(Clone)]
pub struct RestExerciseResponseRepository {
    client: RestClient,
}

impl RestExerciseResponseRepository {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

fn map_rest_error(error: RestError) -> ExerciseResponseRepositoryError {
    if let RestError::Unauthorized { message } = error {
        return ExerciseResponseRepositoryError::unauthorized(message);
    }
    map_basic_rest_error(
        error,
        ExerciseResponseRepositoryError::connection,
        ExerciseResponseRepositoryError::query,
        ExerciseResponseRepositoryError::decode,
    )
}

#[async_trait]
impl ExerciseResponseRepository for RestExerciseResponseRepository {
    async fn find(
        &self,
        user_id: &UserId,
        exercise_id: &str,
    ) -> Result<Option<ExerciseResponse>, ExerciseResponseRepositoryError> {
        let query = TableQuery::table(EXERCISE_RESPONSES)
            .select("*")
            .eq("user_id", user_id)
            .eq("exercise_id", exercise_id);
        let rows: Vec<ExerciseResponseRow> =
            self.client.select(&query).await.map_err(map_rest_error)?;
        rows.into_iter()
            .next()
            .map(ExerciseResponseRow::into_domain)
            .transpose()
            .map_err(ExerciseResponseRepositoryError::decode)
    }

    async fn upsert(
        &self,
        response: &ExerciseResponse,
    ) -> Result<(), ExerciseResponseRepositoryError> {
        let _stored: Vec<IgnoredAny> = self
            .client
            .upsert(
                EXERCISE_RESPONSES,
                RESPONSE_CONFLICT_KEY,
                &[ExerciseResponseRow::from(response)],
            )
            .await
            .map_err(map_rest_error)?;
        Ok(())
    }
}
