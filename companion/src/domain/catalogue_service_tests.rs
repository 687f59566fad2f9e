//! Tests for catalogue reads and seeding.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    ContentRepositoryError, FixtureCatalogueSeedRepository, MockCatalogueSeedRepository,
    MockContentRepository,
};
use crate::domain::{DataSource, ErrorCode};
use crate::outbound::bundled::bundled_catalogue;

#[fixture]
fn bundled() -> Arc<Catalogue> {
    Arc::new(bundled_catalogue().expect("bundled content is valid"))
}

fn remote_chapter(number: u16) -> Chapter {
    Chapter {
        number,
        title: format!("Remote {number}"),
        summary: "remote".to_owned(),
        key_takeaways: Vec::new(),
        reading_minutes: 5,
    }
}

#[rstest]
#[tokio::test]
async fn remote_chapters_are_served_and_sorted(bundled: Arc<Catalogue>) {
    let mut remote = MockContentRepository::new();
    remote
        .expect_list_chapters()
        .times(1)
        .return_once(|| Ok(vec![remote_chapter(2), remote_chapter(1)]));
    let service = CatalogueService::new(Arc::new(remote), bundled);

    let served = service.chapters().await;
    assert_eq!(served.source, DataSource::Remote);
    let numbers: Vec<u16> = served.value.iter().map(|c| c.number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[rstest]
#[tokio::test]
async fn remote_failure_serves_bundled_chapters(bundled: Arc<Catalogue>) {
    let expected = bundled.chapters().len();
    let mut remote = MockContentRepository::new();
    remote
        .expect_list_chapters()
        .times(1)
        .return_once(|| Err(ContentRepositoryError::connection("dns failure")));
    let service = CatalogueService::new(Arc::new(remote), bundled);

    let served = service.chapters().await;
    assert_eq!(served.source, DataSource::Bundled);
    assert!(served.is_degraded());
    assert_eq!(served.value.len(), expected);
}

#[rstest]
#[tokio::test]
async fn empty_remote_answer_is_not_a_failure(bundled: Arc<Catalogue>) {
    let mut remote = MockContentRepository::new();
    remote
        .expect_list_prompts()
        .with(eq(Some(3)))
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    let service = CatalogueService::new(Arc::new(remote), bundled);

    let served = service.prompts(Some(3)).await;
    assert_eq!(served.source, DataSource::Remote);
    assert!(served.value.is_empty());
}

#[rstest]
#[tokio::test]
async fn bundled_prompts_respect_chapter_filter(bundled: Arc<Catalogue>) {
    let mut remote = MockContentRepository::new();
    remote
        .expect_list_prompts()
        .times(1)
        .return_once(|_| Err(ContentRepositoryError::decode("unexpected body")));
    let service = CatalogueService::new(Arc::new(remote), bundled);

    let served = service.prompts(Some(3)).await;
    assert_eq!(served.source, DataSource::Bundled);
    assert!(!served.value.is_empty());
    assert!(served.value.iter().all(|prompt| prompt.chapter_number == 3));
}

#[rstest]
#[tokio::test]
async fn exercise_lookup_falls_back_to_bundled(bundled: Arc<Catalogue>) {
    let mut remote = MockContentRepository::new();
    remote
        .expect_list_exercises()
        .times(1)
        .return_once(|_| Err(ContentRepositoryError::query("500 Internal Server Error")));
    let service = CatalogueService::new(Arc::new(remote), bundled);

    let served = service.find_exercise("ex-1-starting-point").await;
    assert_eq!(served.source, DataSource::Bundled);
    let exercise = served.value.expect("bundled exercise exists");
    assert!(exercise.field("frequency").is_some());
}

#[rstest]
#[tokio::test]
async fn template_search_runs_over_the_serving_tier(bundled: Arc<Catalogue>) {
    let mut remote = MockContentRepository::new();
    remote
        .expect_list_templates()
        .with(eq(None::<String>))
        .times(1)
        .return_once(|_| Err(ContentRepositoryError::connection("timeout")));
    let service = CatalogueService::new(Arc::new(remote), bundled);

    let served = service.search_templates("PLANNING").await;
    assert_eq!(served.source, DataSource::Bundled);
    let ids: Vec<&str> = served.value.iter().map(|t| t.id.as_str()).collect();
    assert!(ids.contains(&"lib-research-plan"));
    assert!(ids.contains(&"lib-learning-plan"));
}

#[rstest]
#[tokio::test]
async fn seeding_reports_row_counts(bundled: Arc<Catalogue>) {
    let report = seed_remote_catalogue(&FixtureCatalogueSeedRepository, &bundled)
        .await
        .expect("seeding succeeds");
    assert_eq!(report.chapters, bundled.chapters().len());
    assert_eq!(report.prompts, bundled.prompts(None).len());
    assert_eq!(report.exercises, bundled.exercises(None).len());
}

#[rstest]
#[tokio::test]
async fn seeding_stops_at_first_failure(bundled: Arc<Catalogue>) {
    let mut repo = MockCatalogueSeedRepository::new();
    repo.expect_upsert_chapters()
        .times(1)
        .return_once(|_| Err(CatalogueSeedError::unauthorized("anon key cannot write")));
    repo.expect_upsert_prompts().times(0);
    repo.expect_upsert_exercises().times(0);

    let error = seed_remote_catalogue(&repo, &bundled)
        .await
        .expect_err("unauthorised");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}
