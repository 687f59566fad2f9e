//! Feedback service: submit, list, mark helpful, delete.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::domain::auth::require_user;
use crate::domain::ports::{AuthSession, FeedbackRepository, FeedbackRepositoryError, RewardLedger};
use crate::domain::{
    Error, Feedback, FeedbackCategory, NewFeedback, PromptRef, RewardAction, RewardsService,
    sort_feedback,
};

fn map_repository_error(error: FeedbackRepositoryError) -> Error {
    match error {
        FeedbackRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("feedback repository unavailable: {message}"))
        }
        FeedbackRepositoryError::Query { message } => {
            Error::internal(format!("feedback repository error: {message}"))
        }
        FeedbackRepositoryError::Decode { message } => {
            Error::internal(format!("feedback repository returned malformed rows: {message}"))
        }
        FeedbackRepositoryError::Unauthorized { message } => {
            Error::unauthorized(format!("feedback not permitted: {message}"))
        }
    }
}

pub struct FeedbackService<F, L> {
    feedback: Arc<F>,
    rewards: RewardsService<L>,
    auth: Arc<dyn AuthSession>,
}

impl<F, L> FeedbackService<F, L>
where
    F: FeedbackRepository,
    L: RewardLedger,
{
    pub fn new(feedback: Arc<F>, rewards: RewardsService<L>, auth: Arc<dyn AuthSession>) -> Self {
        Self {
            feedback,
            rewards,
            auth,
        }
    }

    /// Validate and store feedback, then award points.
    pub async fn submit(
        &self,
        prompt: PromptRef,
        category: FeedbackCategory,
        text: &str,
    ) -> Result<Feedback, Error> {
        let user = require_user(self.auth.as_ref()).await?;
        let feedback = NewFeedback::new(user.id.clone(), prompt, category, text)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let stored = self
            .feedback
            .insert(&feedback)
            .await
            .map_err(map_repository_error)?;

        if let Err(error) = self
            .rewards
            .award(&user.id, RewardAction::FeedbackSubmitted, Some(stored.id.to_string()))
            .await
        {
            warn!(error = %error, feedback_id = %stored.id, "feedback saved but points not awarded");
        }
        Ok(stored)
    }

    /// Feedback for a prompt, most helpful first, then newest.
    pub async fn list_for_prompt(&self, prompt: &PromptRef) -> Result<Vec<Feedback>, Error> {
        let mut entries = self
            .feedback
            .list_for_prompt(prompt)
            .await
            .map_err(map_repository_error)?;
        sort_feedback(&mut entries);
        Ok(entries)
    }

    /// Bump the helpful counter.
    pub async fn mark_helpful(&self, feedback_id: Uuid) -> Result<(), Error> {
        require_user(self.auth.as_ref()).await?;
        self.feedback
            .mark_helpful(feedback_id)
            .await
            .map_err(map_repository_error)
    }

    /// Delete the signed-in user's own feedback.
    pub async fn delete(&self, feedback_id: Uuid) -> Result<(), Error> {
        let user = require_user(self.auth.as_ref()).await?;
        let removed = self
            .feedback
            .delete(&user.id, feedback_id)
            .await
            .map_err(map_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(format!("feedback {feedback_id} not found")))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{FixtureFeedbackRepository, MockFeedbackRepository};
    use crate::domain::{ErrorCode, PromptKind, UserId};
    use crate::test_support::{RecordingLedger, anonymous, fixture_clock, signed_in};

    #[fixture]
    fn user() -> UserId {
        UserId::random()
    }

    fn prompt() -> PromptRef {
        PromptRef::new("lib-meeting-summary", PromptKind::Library).expect("valid prompt")
    }

    fn rewards(ledger: &Arc<RecordingLedger>) -> RewardsService<RecordingLedger> {
        RewardsService::new(Arc::clone(ledger), fixture_clock(), 6)
    }

    #[rstest]
    #[tokio::test]
    async fn submitting_feedback_awards_points(user: UserId) {
        let ledger = Arc::new(RecordingLedger::default());
        let service = FeedbackService::new(
            Arc::new(FixtureFeedbackRepository),
            rewards(&ledger),
            signed_in(&user),
        );

        let stored = service
            .submit(prompt(), FeedbackCategory::Variation, "  Try it with bullet points ")
            .await
            .expect("valid feedback");
        assert_eq!(stored.text, "Try it with bullet points");
        let entries = ledger.entries();
        let award = entries
            .iter()
            .find(|entry| entry.action == RewardAction::FeedbackSubmitted)
            .expect("award recorded");
        assert_eq!(award.points, 15);
        assert_eq!(award.reference_id, Some(stored.id.to_string()));
    }

    #[rstest]
    #[tokio::test]
    async fn blank_feedback_is_invalid(user: UserId) {
        let mut repo = MockFeedbackRepository::new();
        repo.expect_insert().times(0);
        let ledger = Arc::new(RecordingLedger::default());
        let service = FeedbackService::new(Arc::new(repo), rewards(&ledger), signed_in(&user));

        let error = service
            .submit(prompt(), FeedbackCategory::Issue, "   ")
            .await
            .expect_err("blank");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert!(ledger.entries().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn listing_sorts_by_helpfulness_then_recency(user: UserId) {
        let now = Utc::now();
        let make = |text: &str, helpful_count: u32, age_minutes: i64| Feedback {
            id: Uuid::new_v4(),
            user_id: UserId::random(),
            prompt: prompt(),
            category: FeedbackCategory::Success,
            text: text.to_owned(),
            helpful_count,
            created_at: now - Duration::minutes(age_minutes),
        };
        let rows = vec![make("old", 0, 30), make("popular", 4, 60), make("new", 0, 1)];
        let mut repo = MockFeedbackRepository::new();
        repo.expect_list_for_prompt()
            .times(1)
            .return_once(move |_| Ok(rows));
        let ledger = Arc::new(RecordingLedger::default());
        let service = FeedbackService::new(Arc::new(repo), rewards(&ledger), signed_in(&user));

        let listed = service.list_for_prompt(&prompt()).await.expect("list");
        let order: Vec<&str> = listed.iter().map(|entry| entry.text.as_str()).collect();
        assert_eq!(order, vec!["popular", "new", "old"]);
    }

    #[rstest]
    #[tokio::test]
    async fn helpful_votes_require_sign_in() {
        let mut repo = MockFeedbackRepository::new();
        repo.expect_mark_helpful().times(0);
        let ledger = Arc::new(RecordingLedger::default());
        let service = FeedbackService::new(Arc::new(repo), rewards(&ledger), anonymous());

        let error = service
            .mark_helpful(Uuid::new_v4())
            .await
            .expect_err("anonymous");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn helpful_votes_call_the_procedure(user: UserId) {
        let id = Uuid::new_v4();
        let mut repo = MockFeedbackRepository::new();
        repo.expect_mark_helpful()
            .with(eq(id))
            .times(1)
            .return_once(|_| Ok(()));
        let ledger = Arc::new(RecordingLedger::default());
        let service = FeedbackService::new(Arc::new(repo), rewards(&ledger), signed_in(&user));

        service.mark_helpful(id).await.expect("vote recorded");
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_missing_feedback_is_not_found(user: UserId) {
        let ledger = Arc::new(RecordingLedger::default());
        let service = FeedbackService::new(
            Arc::new(FixtureFeedbackRepository),
            rewards(&ledger),
            signed_in(&user),
        );

        let error = service
            .delete(Uuid::new_v4())
            .await
            .expect_err("nothing to delete");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
