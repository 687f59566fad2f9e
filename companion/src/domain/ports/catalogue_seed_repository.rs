//! Port for pushing bundled reference content into the backend.

use async_trait::async_trait;

use crate::domain::{BookPrompt, Chapter, Exercise};

use super::define_port_error;

define_port_error! {
    /// Errors raised while seeding remote content.
    pub enum CatalogueSeedError {
        /// Backend could not be reached.
        Connection { message: String } => "catalogue seeding connection failed: {message}",
        /// Backend rejected the upsert.
        Query { message: String } => "catalogue seeding query failed: {message}",
        /// Credentials lack write access to content tables.
        Unauthorized { message: String } => "catalogue seeding unauthorised: {message}",
    }
}

/// Port for upserting reference content.
///
/// Chapters conflict on `number`; prompts and exercises conflict on `id`.
/// Every call returns the number of rows the backend reported.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueSeedRepository: Send + Sync {
    async fn upsert_chapters(&self, chapters: &[Chapter]) -> Result<usize, CatalogueSeedError>;

    async fn upsert_prompts(&self, prompts: &[BookPrompt]) -> Result<usize, CatalogueSeedError>;

    async fn upsert_exercises(&self, exercises: &[Exercise])
    -> Result<usize, CatalogueSeedError>;
}

/// Fixture implementation that accepts every row.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueSeedRepository;

#[async_trait]
impl CatalogueSeedRepository for FixtureCatalogueSeedRepository {
    async fn upsert_chapters(&self, chapters: &[Chapter]) -> Result<usize, CatalogueSeedError> {
        Ok(chapters.len())
    }

    async fn upsert_prompts(&self, prompts: &[BookPrompt]) -> Result<usize, CatalogueSeedError> {
        Ok(prompts.len())
    }

    async fn upsert_exercises(
        &self,
        exercises: &[Exercise],
    ) -> Result<usize, CatalogueSeedError> {
        Ok(exercises.len())
    }
}
