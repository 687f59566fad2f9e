//! REST-backed `StoryRepository` over `success_stories`.

use async_trait::async_trait;

use super::client::{RestClient, RestError};
use super::dto::{NewStoryRow, StoryRow};
use super::error_mapping::map_basic_rest_error;
use super::query::{Direction, TableQuery};
use crate::domain::ports::{StoryRepository, StoryRepositoryError};
use crate::domain::{NewStory, SuccessStory};

const SUCCESS_STORIES: &str = "success_stories";

#[derive(Clone)]
pub struct RestStoryRepository {
    client: RestClient,
}

impl RestStoryRepository {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

fn map_rest_error(error: RestError) -> StoryRepositoryError {
    if let RestError::Unauthorized { message } = error {
        return StoryRepositoryError::unauthorized(message);
    }
    map_basic_rest_error(
        error,
        StoryRepositoryError::connection,
        StoryRepositoryError::query,
        StoryRepositoryError::decode,
    )
}

fn into_stories(rows: Vec<StoryRow>) -> Result<Vec<SuccessStory>, StoryRepositoryError> {
    rows.into_iter()
        .map(StoryRow::into_domain)
        .collect::<Result<_, _>>()
        .map_err(StoryRepositoryError::decode)
}

#[async_trait]
impl StoryRepository for RestStoryRepository {
    async fn insert(&self, story: &NewStory) -> Result<SuccessStory, StoryRepositoryError> {
        let rows: Vec<StoryRow> = self
            .client
            .insert(SUCCESS_STORIES, &[NewStoryRow::from(story)])
            .await
            .map_err(map_rest_error)?;
        into_stories(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| StoryRepositoryError::decode("insert returned no rows"))
    }

    async fn list_approved(&self) -> Result<Vec<SuccessStory>, StoryRepositoryError> {
        let query = TableQuery::table(SUCCESS_STORIES)
            .select("*")
            .eq("approved", true)
            .order("created_at", Direction::Desc);
        let rows: Vec<StoryRow> = self.client.select(&query).await.map_err(map_rest_error)?;
        into_stories(rows)
    }
}
