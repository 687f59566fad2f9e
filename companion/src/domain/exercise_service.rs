//! Exercise service: load and save responses, award completion once.

use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use crate::domain::auth::require_user;
use crate::domain::ports::{
    AuthSession, ContentRepository, ExerciseResponseRepository, ExerciseResponseRepositoryError,
    RewardLedger,
};
use crate::domain::{
    Answers, CatalogueService, Error, ExerciseResponse, RewardAction, RewardsService,
    validate_response,
};

fn map_repository_error(error: ExerciseResponseRepositoryError) -> Error {
    match error {
        ExerciseResponseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("exercise responses unavailable: {message}"))
        }
        ExerciseResponseRepositoryError::Query { message } => {
            Error::internal(format!("exercise response repository error: {message}"))
        }
        ExerciseResponseRepositoryError::Decode { message } => {
            Error::internal(format!("exercise response malformed: {message}"))
        }
        ExerciseResponseRepositoryError::Unauthorized { message } => {
            Error::unauthorized(format!("exercise response not permitted: {message}"))
        }
    }
}

pub struct ExerciseService<C, E, L> {
    catalogue: CatalogueService<C>,
    responses: Arc<E>,
    rewards: RewardsService<L>,
    auth: Arc<dyn AuthSession>,
    clock: Arc<dyn Clock>,
}

impl<C, E, L> ExerciseService<C, E, L>
where
    C: ContentRepository,
    E: ExerciseResponseRepository,
    L: RewardLedger,
{
    pub fn new(
        catalogue: CatalogueService<C>,
        responses: Arc<E>,
        rewards: RewardsService<L>,
        auth: Arc<dyn AuthSession>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalogue,
            responses,
            rewards,
            auth,
            clock,
        }
    }

    /// The signed-in user's saved response, if any.
    pub async fn load_response(&self, exercise_id: &str) -> Result<Option<ExerciseResponse>, Error> {
        let user = require_user(self.auth.as_ref()).await?;
        self.responses
            .find(&user.id, exercise_id)
            .await
            .map_err(map_repository_error)
    }

    /// Validate and upsert answers.
    ///
    /// Completing an exercise awards points the first time only.
    pub async fn save_response(
        &self,
        exercise_id: &str,
        answers: Answers,
        completed: bool,
    ) -> Result<ExerciseResponse, Error> {
        let user = require_user(self.auth.as_ref()).await?;
        let exercise = self
            .catalogue
            .find_exercise(exercise_id)
            .await
            .into_inner()
            .ok_or_else(|| Error::not_found(format!("exercise {exercise_id} not found")))?;
        validate_response(&exercise, &answers, completed)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let response = ExerciseResponse {
            user_id: user.id.clone(),
            exercise_id: exercise.id,
            answers,
            completed,
            updated_at: self.clock.utc(),
        };
        self.responses
            .upsert(&response)
            .await
            .map_err(map_repository_error)?;

        if completed
            && let Err(error) = self
                .rewards
                .award_once(&user.id, RewardAction::ExerciseCompleted, &response.exercise_id)
                .await
        {
            warn!(
                error = %error,
                exercise_id = %response.exercise_id,
                "response saved but points not awarded"
            );
        }
        Ok(response)
    }
}

#[cfg(test)]
#[path = "exercise_service_tests.rs"]
mod tests;
