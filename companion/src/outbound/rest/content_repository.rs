//! REST-backed `ContentRepository` reading the remote catalogue tables.

use async_trait::async_trait;

use super::client::{RestClient, RestError};
use super::dto::{BookPromptRow, ChapterRow, ExerciseRow, TemplateRow};
use super::error_mapping::map_basic_rest_error;
use super::query::{Direction, TableQuery};
use crate::domain::ports::{ContentRepository, ContentRepositoryError};
use crate::domain::{BookPrompt, Chapter, Exercise, PromptTemplate};

const CHAPTERS: &str = "chapters";
const BOOK_PROMPTS: &str = "book_prompts";
const BOOK_EXERCISES: &str = "book_exercises";
const PROMPT_LIBRARY: &str = "prompt_library";

/// Remote tier of the two-tier catalogue lookup.
#[derive(Clone)]
pub struct RestContentRepository {
    client: RestClient,
}

impl RestContentRepository {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

fn map_rest_error(error: RestError) -> ContentRepositoryError {
    map_basic_rest_error(
        error,
        ContentRepositoryError::connection,
        ContentRepositoryError::query,
        ContentRepositoryError::decode,
    )
}

fn by_chapter(query: TableQuery, chapter: Option<u16>) -> TableQuery {
    match chapter {
        Some(number) => query.eq("chapter_number", number),
        None => query,
    }
}

#[async_trait]
impl ContentRepository for RestContentRepository {
    async fn list_chapters(&self) -> Result<Vec<Chapter>, ContentRepositoryError> {
        let query = TableQuery::table(CHAPTERS)
            .select("*")
            .order("number", Direction::Asc);
        let rows: Vec<ChapterRow> = self.client.select(&query).await.map_err(map_rest_error)?;
        Ok(rows.into_iter().map(Chapter::from).collect())
    }

    async fn list_prompts(
        &self,
        chapter: Option<u16>,
    ) -> Result<Vec<BookPrompt>, ContentRepositoryError> {
        let query = by_chapter(TableQuery::table(BOOK_PROMPTS).select("*"), chapter)
            .order("chapter_number", Direction::Asc)
            .order("id", Direction::Asc);
        let rows: Vec<BookPromptRow> = self.client.select(&query).await.map_err(map_rest_error)?;
        Ok(rows.into_iter().map(BookPrompt::from).collect())
    }

    async fn list_exercises(
        &self,
        chapter: Option<u16>,
    ) -> Result<Vec<Exercise>, ContentRepositoryError> {
        let query = by_chapter(TableQuery::table(BOOK_EXERCISES).select("*"), chapter)
            .order("chapter_number", Direction::Asc)
            .order("id", Direction::Asc);
        let rows: Vec<ExerciseRow> = self.client.select(&query).await.map_err(map_rest_error)?;
        Ok(rows.into_iter().map(ExerciseRow::into_domain).collect())
    }

    async fn list_templates(
        &self,
        category: Option<String>,
    ) -> Result<Vec<PromptTemplate>, ContentRepositoryError> {
        let query = TableQuery::table(PROMPT_LIBRARY).select("*");
        let query = match category {
            Some(category) => query.eq("category", category),
            None => query,
        }
        .order("title", Direction::Asc);
        let rows: Vec<TemplateRow> = self.client.select(&query).await.map_err(map_rest_error)?;
        Ok(rows.into_iter().map(PromptTemplate::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::outbound::rest::test_server::CannedServer;

    #[rstest]
    #[tokio::test]
    async fn chapters_are_requested_in_order_with_api_headers() {
        let server = CannedServer::replying(
            200,
            json!([{
                "number": 1,
                "title": "Why now",
                "summary": "s",
                "key_takeaways": ["start small"],
                "reading_minutes": 12
            }]),
        )
        .await;
        let repo = RestContentRepository::new(server.client(None));

        let chapters = repo.list_chapters().await.expect("chapters");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].key_takeaways, vec!["start small".to_owned()]);

        let request = server.only_request();
        assert_eq!(request.method, "GET");
        assert_eq!(request.target, "/rest/v1/chapters?select=*&order=number.asc");
        assert_eq!(request.header("apikey"), Some("anon-key"));
        assert_eq!(request.header("authorization"), Some("Bearer anon-key"));
    }

    #[rstest]
    #[tokio::test]
    async fn chapter_filter_is_sent_as_eq() {
        let server = CannedServer::replying(200, json!([])).await;
        let repo = RestContentRepository::new(server.client(Some("user-token")));

        let prompts = repo.list_prompts(Some(3)).await.expect("prompts");
        assert!(prompts.is_empty());

        let request = server.only_request();
        assert_eq!(
            request.target,
            "/rest/v1/book_prompts?select=*&chapter_number=eq.3&order=chapter_number.asc%2Cid.asc"
        );
        assert_eq!(request.header("authorization"), Some("Bearer user-token"));
    }

    #[rstest]
    #[tokio::test]
    async fn server_errors_map_to_query_errors() {
        let server = CannedServer::replying(500, json!({"message": "boom"})).await;
        let repo = RestContentRepository::new(server.client(None));

        let error = repo.list_templates(None).await.expect_err("server error");
        assert!(matches!(error, ContentRepositoryError::Query { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn unexpected_shapes_map_to_decode_errors() {
        let server = CannedServer::replying(200, json!({"not": "a list"})).await;
        let repo = RestContentRepository::new(server.client(None));

        let error = repo.list_exercises(None).await.expect_err("decode error");
        assert!(matches!(error, ContentRepositoryError::Decode { .. }));
    }
}
