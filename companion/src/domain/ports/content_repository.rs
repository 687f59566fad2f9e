//! Remote-tier port for reference content.
//!
//! Adapters return content already mapped into domain types. Rows that do not
//! decode are the adapter's problem: it either drops them with a warning or
//! fails the whole read with [`ContentRepositoryError::Decode`], in which case
//! the calling service falls back to bundled data.

use async_trait::async_trait;

use crate::domain::{BookPrompt, Chapter, Exercise, PromptTemplate};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading remote content.
    pub enum ContentRepositoryError {
        /// Backend could not be reached.
        Connection { message: String } => "content read connection failed: {message}",
        /// Backend rejected or failed the query.
        Query { message: String } => "content read query failed: {message}",
        /// Response body did not match the expected shape.
        Decode { message: String } => "content response decode failed: {message}",
    }
}

/// Port for reading chapters, prompts, exercises, and library templates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Chapters ordered by number.
    async fn list_chapters(&self) -> Result<Vec<Chapter>, ContentRepositoryError>;

    /// Book prompts, optionally for one chapter.
    async fn list_prompts(
        &self,
        chapter: Option<u16>,
    ) -> Result<Vec<BookPrompt>, ContentRepositoryError>;

    /// Exercises, optionally for one chapter.
    async fn list_exercises(
        &self,
        chapter: Option<u16>,
    ) -> Result<Vec<Exercise>, ContentRepositoryError>;

    /// Prompt-library templates, optionally for one category.
    async fn list_templates(
        &self,
        category: Option<String>,
    ) -> Result<Vec<PromptTemplate>, ContentRepositoryError>;
}

/// Fixture implementation that serves an empty remote catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContentRepository;

#[async_trait]
impl ContentRepository for FixtureContentRepository {
    async fn list_chapters(&self) -> Result<Vec<Chapter>, ContentRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_prompts(
        &self,
        _chapter: Option<u16>,
    ) -> Result<Vec<BookPrompt>, ContentRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_exercises(
        &self,
        _chapter: Option<u16>,
    ) -> Result<Vec<Exercise>, ContentRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_templates(
        &self,
        _category: Option<String>,
    ) -> Result<Vec<PromptTemplate>, ContentRepositoryError> {
        Ok(Vec::new())
    }
}
