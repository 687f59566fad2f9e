//! Tests for the exercise service.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{
    ContentRepositoryError, FixtureExerciseResponseRepository, MockContentRepository,
    MockExerciseResponseRepository,
};
use crate::domain::{Catalogue, ErrorCode, UserId, normalise_answers};
use crate::outbound::bundled::bundled_catalogue;
use crate::test_support::{RecordingLedger, fixture_clock, fixture_timestamp, signed_in};

#[fixture]
fn user() -> UserId {
    UserId::random()
}

/// Catalogue whose remote tier is down, so bundled exercises answer.
fn offline_catalogue() -> CatalogueService<MockContentRepository> {
    let mut remote = MockContentRepository::new();
    remote
        .expect_list_exercises()
        .returning(|_| Err(ContentRepositoryError::connection("offline")));
    let bundled: Catalogue = bundled_catalogue().expect("bundled content is valid");
    CatalogueService::new(Arc::new(remote), Arc::new(bundled))
}

fn starting_point_answers() -> Answers {
    normalise_answers(
        "ex-1-starting-point",
        json!({"frequency": "Weekly", "confidence": 3}),
    )
}

fn service<E: ExerciseResponseRepository>(
    responses: E,
    ledger: &Arc<RecordingLedger>,
    user: &UserId,
) -> ExerciseService<MockContentRepository, E, RecordingLedger> {
    ExerciseService::new(
        offline_catalogue(),
        Arc::new(responses),
        RewardsService::new(Arc::clone(ledger), fixture_clock(), 6),
        signed_in(user),
        fixture_clock(),
    )
}

#[rstest]
#[tokio::test]
async fn completing_twice_awards_once(user: UserId) {
    let ledger = Arc::new(RecordingLedger::default());
    let exercises = service(FixtureExerciseResponseRepository, &ledger, &user);

    for _ in 0..2 {
        let saved = exercises
            .save_response("ex-1-starting-point", starting_point_answers(), true)
            .await
            .expect("valid response");
        assert_eq!(saved.updated_at, fixture_timestamp());
    }

    let completions = ledger
        .entries()
        .iter()
        .filter(|entry| entry.action == RewardAction::ExerciseCompleted)
        .count();
    assert_eq!(completions, 1);
}

#[rstest]
#[tokio::test]
async fn drafts_do_not_award(user: UserId) {
    let ledger = Arc::new(RecordingLedger::default());
    let exercises = service(FixtureExerciseResponseRepository, &ledger, &user);

    exercises
        .save_response(
            "ex-1-starting-point",
            normalise_answers("ex-1-starting-point", json!({"hopes": "less email"})),
            false,
        )
        .await
        .expect("drafts may be partial");
    assert!(ledger.entries().is_empty());
}

#[rstest]
#[tokio::test]
async fn invalid_answers_are_rejected_before_saving(user: UserId) {
    let mut responses = MockExerciseResponseRepository::new();
    responses.expect_upsert().times(0);
    let ledger = Arc::new(RecordingLedger::default());
    let exercises = service(responses, &ledger, &user);

    let error = exercises
        .save_response(
            "ex-1-starting-point",
            normalise_answers("ex-1-starting-point", json!({"confidence": 11})),
            false,
        )
        .await
        .expect_err("out of range");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn unknown_exercise_is_not_found(user: UserId) {
    let ledger = Arc::new(RecordingLedger::default());
    let exercises = service(FixtureExerciseResponseRepository, &ledger, &user);

    let error = exercises
        .save_response("ex-99-missing", Answers::new(), false)
        .await
        .expect_err("unknown exercise");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn storage_outage_maps_to_service_unavailable(user: UserId) {
    let mut responses = MockExerciseResponseRepository::new();
    responses
        .expect_find()
        .times(1)
        .return_once(|_, _| Err(ExerciseResponseRepositoryError::connection("reset by peer")));
    let ledger = Arc::new(RecordingLedger::default());
    let exercises = service(responses, &ledger, &user);

    let error = exercises
        .load_response("ex-1-starting-point")
        .await
        .expect_err("outage");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn answers_to_skipped_remote_fields_still_save(user: UserId) {
    let bundled: Catalogue = bundled_catalogue().expect("bundled content is valid");
    let mut degraded = bundled
        .find_exercise("ex-1-starting-point")
        .expect("bundled exercise")
        .clone();
    degraded.fields.retain(|field| field.id != "confidence");
    let mut remote = MockContentRepository::new();
    remote
        .expect_list_exercises()
        .returning(move |_| Ok(vec![degraded.clone()]));

    let mut responses = MockExerciseResponseRepository::new();
    responses
        .expect_upsert()
        .withf(|response| response.answers.get("confidence") == Some(&json!(3)))
        .times(1)
        .returning(|_| Ok(()));
    let ledger = Arc::new(RecordingLedger::default());
    let exercises = ExerciseService::new(
        CatalogueService::new(Arc::new(remote), Arc::new(bundled)),
        Arc::new(responses),
        RewardsService::new(Arc::clone(&ledger), fixture_clock(), 6),
        signed_in(&user),
        fixture_clock(),
    );

    let saved = exercises
        .save_response("ex-1-starting-point", starting_point_answers(), false)
        .await
        .expect("answers for a skipped field are kept");
    assert_eq!(saved.answers, starting_point_answers());
}
