//! Catalogue reads with bundled fallback, and seeding of remote content.
//!
//! Every read tries the backend first. Any remote failure is logged and the
//! bundled catalogue answers instead; callers see which tier served them via
//! [`Tiered::source`](crate::domain::Tiered).

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::ports::{CatalogueSeedError, CatalogueSeedRepository, ContentRepository};
use crate::domain::{
    BookPrompt, Catalogue, Chapter, Error, Exercise, PromptTemplate, Tiered, search_templates,
    with_fallback,
};

/// Read service over the remote and bundled content tiers.
pub struct CatalogueService<C> {
    remote: Arc<C>,
    bundled: Arc<Catalogue>,
}

impl<C> Clone for CatalogueService<C> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            bundled: Arc::clone(&self.bundled),
        }
    }
}

impl<C> CatalogueService<C>
where
    C: ContentRepository,
{
    pub fn new(remote: Arc<C>, bundled: Arc<Catalogue>) -> Self {
        Self { remote, bundled }
    }

    /// The bundled tier.
    pub fn bundled(&self) -> &Catalogue {
        &self.bundled
    }

    /// Chapters ordered by number.
    pub async fn chapters(&self) -> Tiered<Vec<Chapter>> {
        with_fallback("chapters", self.remote.list_chapters(), || {
            self.bundled.chapters().to_vec()
        })
        .await
        .map(|mut chapters| {
            chapters.sort_by_key(|chapter| chapter.number);
            chapters
        })
    }

    pub async fn find_chapter(&self, number: u16) -> Tiered<Option<Chapter>> {
        self.chapters()
            .await
            .map(|chapters| chapters.into_iter().find(|chapter| chapter.number == number))
    }

    /// Book prompts, optionally for one chapter.
    pub async fn prompts(&self, chapter: Option<u16>) -> Tiered<Vec<BookPrompt>> {
        with_fallback("book_prompts", self.remote.list_prompts(chapter), || {
            self.bundled.prompts(chapter)
        })
        .await
    }

    /// Exercises, optionally for one chapter.
    pub async fn exercises(&self, chapter: Option<u16>) -> Tiered<Vec<Exercise>> {
        with_fallback("book_exercises", self.remote.list_exercises(chapter), || {
            self.bundled.exercises(chapter)
        })
        .await
    }

    pub async fn find_exercise(&self, id: &str) -> Tiered<Option<Exercise>> {
        self.exercises(None)
            .await
            .map(|exercises| exercises.into_iter().find(|exercise| exercise.id == id))
    }

    /// Prompt-library templates, optionally for one category.
    pub async fn templates(&self, category: Option<&str>) -> Tiered<Vec<PromptTemplate>> {
        with_fallback(
            "prompt_library",
            self.remote.list_templates(category.map(str::to_owned)),
            || self.bundled.templates(category),
        )
        .await
    }

    /// Templates matching a case-insensitive query over title, description,
    /// and tags.
    pub async fn search_templates(&self, query: &str) -> Tiered<Vec<PromptTemplate>> {
        self.templates(None).await.map(|templates| {
            search_templates(&templates, query)
                .into_iter()
                .cloned()
                .collect()
        })
    }
}

/// Row counts reported by a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub chapters: usize,
    pub prompts: usize,
    pub exercises: usize,
}

fn map_seed_error(error: CatalogueSeedError) -> Error {
    match error {
        CatalogueSeedError::Connection { message } => {
            Error::service_unavailable(format!("catalogue seeding unavailable: {message}"))
        }
        CatalogueSeedError::Query { message } => {
            Error::internal(format!("catalogue seeding failed: {message}"))
        }
        CatalogueSeedError::Unauthorized { message } => {
            Error::unauthorized(format!("catalogue seeding not permitted: {message}"))
        }
    }
}

/// Upsert the bundled catalogue into the backend.
///
/// Chapters go first so prompt and exercise foreign keys resolve.
pub async fn seed_remote_catalogue<S>(repo: &S, catalogue: &Catalogue) -> Result<SeedReport, Error>
where
    S: CatalogueSeedRepository + ?Sized,
{
    let chapters = repo
        .upsert_chapters(catalogue.chapters())
        .await
        .map_err(map_seed_error)?;
    let prompts = repo
        .upsert_prompts(&catalogue.prompts(None))
        .await
        .map_err(map_seed_error)?;
    let exercises = repo
        .upsert_exercises(&catalogue.exercises(None))
        .await
        .map_err(map_seed_error)?;

    let report = SeedReport {
        chapters,
        prompts,
        exercises,
    };
    info!(
        chapters = report.chapters,
        prompts = report.prompts,
        exercises = report.exercises,
        "remote catalogue seeded"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
