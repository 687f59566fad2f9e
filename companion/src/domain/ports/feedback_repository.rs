//! Port for prompt feedback.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Feedback, NewFeedback, PromptRef, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by feedback persistence adapters.
    pub enum FeedbackRepositoryError {
        /// Backend could not be reached.
        Connection { message: String } => "feedback repository connection failed: {message}",
        /// Backend rejected or failed the query.
        Query { message: String } => "feedback repository query failed: {message}",
        /// Stored rows did not decode.
        Decode { message: String } => "feedback repository decode failed: {message}",
        /// Row-level security refused the caller.
        Unauthorized { message: String } => "feedback repository unauthorised: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Persist new feedback and return the stored row.
    async fn insert(&self, feedback: &NewFeedback) -> Result<Feedback, FeedbackRepositoryError>;

    /// All feedback for a prompt, in any order.
    async fn list_for_prompt(
        &self,
        prompt: &PromptRef,
    ) -> Result<Vec<Feedback>, FeedbackRepositoryError>;

    /// Increment the helpful counter through the backend procedure.
    async fn mark_helpful(&self, feedback_id: Uuid) -> Result<(), FeedbackRepositoryError>;

    /// Delete feedback owned by `user_id`. Returns whether a row was removed.
    async fn delete(
        &self,
        user_id: &UserId,
        feedback_id: Uuid,
    ) -> Result<bool, FeedbackRepositoryError>;
}

/// Fixture implementation with no stored feedback.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFeedbackRepository;

#[async_trait]
impl FeedbackRepository for FixtureFeedbackRepository {
    async fn insert(&self, feedback: &NewFeedback) -> Result<Feedback, FeedbackRepositoryError> {
        Ok(Feedback {
            id: Uuid::new_v4(),
            user_id: feedback.user_id.clone(),
            prompt: feedback.prompt.clone(),
            category: feedback.category,
            text: feedback.text.clone(),
            helpful_count: 0,
            created_at: chrono::Utc::now(),
        })
    }

    async fn list_for_prompt(
        &self,
        _prompt: &PromptRef,
    ) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
        Ok(Vec::new())
    }

    async fn mark_helpful(&self, _feedback_id: Uuid) -> Result<(), FeedbackRepositoryError> {
        Ok(())
    }

    async fn delete(
        &self,
        _user_id: &UserId,
        _feedback_id: Uuid,
    ) -> Result<bool, FeedbackRepositoryError> {
        Ok(false)
    }
}
