//! Port for saved exercise answers.

use async_trait::async_trait;

use crate::domain::{ExerciseResponse, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by exercise response adapters.
    pub enum ExerciseResponseRepositoryError {
        /// Backend could not be reached.
        Connection { message: String } =>
            "exercise response repository connection failed: {message}",
        /// Backend rejected or failed the query.
        Query { message: String } => "exercise response repository query failed: {message}",
        /// Stored row did not decode.
        Decode { message: String } => "exercise response repository decode failed: {message}",
        /// Row-level security refused the caller.
        Unauthorized { message: String } =>
            "exercise response repository unauthorised: {message}",
    }
}

/// Port for exercise responses, keyed by (user, exercise id).
///
/// Adapters must hand back answers as an object even when the stored
/// payload is malformed; see [`normalise_answers`](crate::domain::normalise_answers).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExerciseResponseRepository: Send + Sync {
    async fn find(
        &self,
        user_id: &UserId,
        exercise_id: &str,
    ) -> Result<Option<ExerciseResponse>, ExerciseResponseRepositoryError>;

    async fn upsert(&self, response: &ExerciseResponse)
    -> Result<(), ExerciseResponseRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExerciseResponseRepository;

#[async_trait]
impl ExerciseResponseRepository for FixtureExerciseResponseRepository {
    async fn find(
        &self,
        _user_id: &UserId,
        _exercise_id: &str,
    ) -> Result<Option<ExerciseResponse>, ExerciseResponseRepositoryError> {
        Ok(None)
    }

    async fn upsert(
        &self,
        _response: &ExerciseResponse,
    ) -> Result<(), ExerciseResponseRepositoryError> {
        Ok(())
    }
}
