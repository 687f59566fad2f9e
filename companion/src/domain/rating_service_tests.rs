//! Tests for the rating service.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockRatingRepository, RatingRepositoryError};
use crate::domain::{DimensionScores, ErrorCode, PromptKind, UserId};
use crate::test_support::{RecordingLedger, anonymous, fixture_clock, signed_in};

/// Keyed in-memory store so upsert semantics can be observed end to end.
#[derive(Default)]
struct InMemoryRatings(Mutex<Vec<PromptRating>>);

impl InMemoryRatings {
    fn rows(&self) -> std::sync::MutexGuard<'_, Vec<PromptRating>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("ratings mutex"),
        }
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatings {
    async fn find_rating(
        &self,
        user_id: &UserId,
        prompt: &PromptRef,
    ) -> Result<Option<PromptRating>, RatingRepositoryError> {
        Ok(self
            .rows()
            .iter()
            .find(|row| &row.user_id == user_id && &row.prompt == prompt)
            .cloned())
    }

    async fn upsert_rating(
        &self,
        rating: &PromptRating,
    ) -> Result<PromptRating, RatingRepositoryError> {
        let mut rows = self.rows();
        rows.retain(|row| !(row.user_id == rating.user_id && row.prompt == rating.prompt));
        rows.push(rating.clone());
        Ok(rating.clone())
    }

    async fn list_scores(
        &self,
        prompt: &PromptRef,
    ) -> Result<Vec<DimensionScores>, RatingRepositoryError> {
        Ok(self
            .rows()
            .iter()
            .filter(|row| &row.prompt == prompt)
            .map(|row| row.scores)
            .collect())
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

#[fixture]
fn user() -> UserId {
    UserId::random()
}

fn prompt() -> PromptRef {
    PromptRef::new("ch3-structured-brief", PromptKind::Book).expect("valid prompt")
}

fn draft(effectiveness: u8, clarity: u8, time_value: u8) -> RatingDraft {
    RatingDraft {
        prompt: prompt(),
        effectiveness,
        clarity,
        time_value,
        comment: None,
    }
}

fn rewards(ledger: &Arc<RecordingLedger>) -> RewardsService<RecordingLedger> {
    RewardsService::new(Arc::clone(ledger), fixture_clock(), 6)
}

#[rstest]
#[tokio::test]
async fn resubmitting_replaces_the_rating_and_awards_once(user: UserId) {
    let ratings = Arc::new(InMemoryRatings::default());
    let ledger = Arc::new(RecordingLedger::default());
    let service = RatingService::new(
        Arc::clone(&ratings),
        rewards(&ledger),
        signed_in(&user),
        fixture_clock(),
    );

    service.submit_rating(draft(5, 5, 5)).await.expect("first");
    let second = service.submit_rating(draft(1, 1, 1)).await.expect("second");

    assert_eq!(ratings.rows().len(), 1);
    assert_eq!(second.overall(), 1.0);
    let stats = service.rating_stats(&prompt()).await.expect("stats");
    assert_eq!(stats.total, 1);

    let rated = ledger
        .entries()
        .iter()
        .filter(|entry| entry.action == RewardAction::PromptRated)
        .count();
    assert_eq!(rated, 1);
}

#[rstest]
#[tokio::test]
async fn out_of_range_scores_never_reach_the_repository(user: UserId) {
    let mut ratings = MockRatingRepository::new();
    ratings.expect_find_rating().times(0);
    ratings.expect_upsert_rating().times(0);
    let ledger = Arc::new(RecordingLedger::default());
    let service = RatingService::new(
        Arc::new(ratings),
        rewards(&ledger),
        signed_in(&user),
        fixture_clock(),
    );

    let error = service
        .submit_rating(draft(6, 3, 3))
        .await
        .expect_err("invalid score");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.notification().title, "Check your input");
}

#[rstest]
#[tokio::test]
async fn anonymous_users_cannot_rate() {
    let ledger = Arc::new(RecordingLedger::default());
    let service = RatingService::new(
        Arc::new(MockRatingRepository::new()),
        rewards(&ledger),
        anonymous(),
        fixture_clock(),
    );

    let error = service
        .submit_rating(draft(4, 4, 4))
        .await
        .expect_err("anonymous");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn stats_aggregate_repository_scores(user: UserId) {
    let mut ratings = MockRatingRepository::new();
    ratings.expect_list_scores().times(1).return_once(|_| {
        Ok(vec![
            DimensionScores::new(5, 5, 5).expect("valid"),
            DimensionScores::new(1, 1, 1).expect("valid"),
        ])
    });
    let ledger = Arc::new(RecordingLedger::default());
    let service = RatingService::new(
        Arc::new(ratings),
        rewards(&ledger),
        signed_in(&user),
        fixture_clock(),
    );

    let stats = service.rating_stats(&prompt()).await.expect("stats");
    assert_eq!(stats.average_overall, 3.0);
}

#[rstest]
#[case(RatingRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(RatingRepositoryError::unauthorized("rls"), ErrorCode::Unauthorized)]
#[case(RatingRepositoryError::decode("bad row"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_map_to_codes(
    user: UserId,
    #[case] failure: RatingRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut ratings = MockRatingRepository::new();
    ratings
        .expect_list_quick_scores()
        .times(1)
        .return_once(move |_| Err(failure));
    let ledger = Arc::new(RecordingLedger::default());
    let service = RatingService::new(
        Arc::new(ratings),
        rewards(&ledger),
        signed_in(&user),
        fixture_clock(),
    );

    let error = service
        .quick_rating_summary(&prompt())
        .await
        .expect_err("failure");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn quick_ratings_validate_stars(user: UserId) {
    let mut ratings = MockRatingRepository::new();
    ratings
        .expect_upsert_quick_rating()
        .times(1)
        .return_once(|_| Ok(()));
    let ledger = Arc::new(RecordingLedger::default());
    let service = RatingService::new(
        Arc::new(ratings),
        rewards(&ledger),
        signed_in(&user),
        fixture_clock(),
    );

    let saved = service
        .submit_quick_rating(prompt(), 4)
        .await
        .expect("valid stars");
    assert_eq!(saved.stars.get(), 4);
    let error = service
        .submit_quick_rating(prompt(), 0)
        .await
        .expect_err("zero stars");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}
