//! REST-backed `CatalogueSeedRepository` that upserts bundled content.
//!
//! Requires credentials with write access to the content tables; an anon
//! key normally lacks it and the backend answers 401 or 403.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::IgnoredAny;

use super::client::{RestClient, RestError};
use super::dto::{BookPromptRow, ChapterRow, ExerciseRow};
use crate::domain::ports::{CatalogueSeedError, CatalogueSeedRepository};
use crate::domain::{BookPrompt, Chapter, Exercise};

#[derive(Clone)]
pub struct RestCatalogueSeedRepository {
    client: RestClient,
}

impl RestCatalogueSeedRepository {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    async fn upsert_rows<R>(
        &self,
        table: &'static str,
        conflict_key: &str,
        rows: &[R],
    ) -> Result<usize, CatalogueSeedError>
    where
        R: Serialize + Sync,
    {
        if rows.is_empty() {
            return Ok(0);
        }
        let stored: Vec<IgnoredAny> = self
            .client
            .upsert(table, conflict_key, rows)
            .await
            .map_err(map_rest_error)?;
        Ok(stored.len())
    }
}

fn map_rest_error(error: RestError) -> CatalogueSeedError {
    match error {
        RestError::Timeout { message } | RestError::Transport { message } => {
            CatalogueSeedError::connection(message)
        }
        RestError::Unauthorized { message } => CatalogueSeedError::unauthorized(message),
        RestError::Rejected { message }
        | RestError::Server { message }
        | RestError::Decode { message }
        | RestError::Client { message } => CatalogueSeedError::query(message),
    }
}

#[async_trait]
impl CatalogueSeedRepository for RestCatalogueSeedRepository {
    async fn upsert_chapters(&self, chapters: &[Chapter]) -> Result<usize, CatalogueSeedError> {
        let rows: Vec<ChapterRow> = chapters.iter().map(ChapterRow::from).collect();
        self.upsert_rows("chapters", "number", &rows).await
    }

    async fn upsert_prompts(&self, prompts: &[BookPrompt]) -> Result<usize, CatalogueSeedError> {
        let rows: Vec<BookPromptRow> = prompts.iter().map(BookPromptRow::from).collect();
        self.upsert_rows("book_prompts", "id", &rows).await
    }

    async fn upsert_exercises(
        &self,
        exercises: &[Exercise],
    ) -> Result<usize, CatalogueSeedError> {
        let rows = exercises
            .iter()
            .map(ExerciseRow::from_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(CatalogueSeedError::query)?;
        self.upsert_rows("book_exercises", "id", &rows).await
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::outbound::bundled::bundled_catalogue;
    use crate::outbound::rest::test_server::CannedServer;

    #[rstest]
    #[tokio::test]
    async fn exercises_are_upserted_with_field_configs() {
        let catalogue = bundled_catalogue().expect("bundled content");
        let exercises = catalogue.exercises(Some(1));
        let server = CannedServer::replying(201, json!([{}])).await;
        let repo = RestCatalogueSeedRepository::new(server.client(Some("service-token")));

        let count = repo.upsert_exercises(&exercises).await.expect("upsert");
        assert_eq!(count, 1);

        let request = server.only_request();
        assert_eq!(request.target, "/rest/v1/book_exercises?on_conflict=id");
        let body = request.json();
        assert_eq!(body[0]["fields"][0]["type"], json!("single_choice"));
    }

    #[rstest]
    #[tokio::test]
    async fn empty_batches_skip_the_request() {
        let server = CannedServer::start(Vec::new()).await;
        let repo = RestCatalogueSeedRepository::new(server.client(None));

        assert_eq!(repo.upsert_prompts(&[]).await, Ok(0));
        assert!(server.requests().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn anon_credentials_are_unauthorised() {
        let server = CannedServer::replying(401, json!({"message": "permission denied"})).await;
        let repo = RestCatalogueSeedRepository::new(server.client(None));
        let chapters = bundled_catalogue().expect("bundled content").chapters().to_vec();

        let error = repo.upsert_chapters(&chapters).await.expect_err("denied");
        assert!(matches!(error, CatalogueSeedError::Unauthorized { .. }));
    }
}
