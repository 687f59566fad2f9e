//! Read-only reference content: chapters, book prompts, exercises, and
//! prompt-library templates.
//!
//! The same types are served by the remote tier and by the bundled tier, so
//! callers never need to know which one answered beyond the
//! [`Tiered`](crate::domain::Tiered) tag.

use serde::{Deserialize, Serialize};

mod fields;
#[cfg(test)]
mod tests;

pub use fields::{ExerciseField, FieldConfigError, FieldKind};

/// A book chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub number: u16,
    pub title: String,
    pub summary: String,
    pub key_takeaways: Vec<String>,
    pub reading_minutes: u16,
}

/// A prompt printed in the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPrompt {
    pub id: String,
    pub chapter_number: u16,
    pub title: String,
    pub body: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// A structured exercise attached to a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub chapter_number: u16,
    pub title: String,
    pub description: String,
    pub estimated_minutes: Option<u16>,
    pub fields: Vec<ExerciseField>,
}

impl Exercise {
    /// Look up a field by id.
    pub fn field(&self, id: &str) -> Option<&ExerciseField> {
        self.fields.iter().find(|field| field.id == id)
    }
}

/// A reusable template from the prompt library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub body: String,
    pub tags: Vec<String>,
    pub difficulty: Option<String>,
}

impl PromptTemplate {
    /// Case-insensitive match over title, description, and tags.
    ///
    /// `needle` must already be lower-cased.
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }
}

/// Search templates by free text.
///
/// A blank query returns every template. Order is preserved.
///
/// # Examples
/// ```
/// use companion::domain::{PromptTemplate, search_templates};
///
/// let template = PromptTemplate {
///     id: "lib-meeting-summary".into(),
///     title: "Meeting summary".into(),
///     description: "Turn notes into actions".into(),
///     category: "communication".into(),
///     body: "Summarise: [notes]".into(),
///     tags: vec!["meetings".into()],
///     difficulty: None,
/// };
/// let templates = [template];
/// assert_eq!(search_templates(&templates, "MEETING").len(), 1);
/// assert!(search_templates(&templates, "budget").is_empty());
/// ```
pub fn search_templates<'a>(templates: &'a [PromptTemplate], query: &str) -> Vec<&'a PromptTemplate> {
    let needle = query.trim().to_lowercase();
    templates
        .iter()
        .filter(|template| needle.is_empty() || template.matches(&needle))
        .collect()
}

/// In-memory catalogue; the bundled tier's view of the content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    chapters: Vec<Chapter>,
    prompts: Vec<BookPrompt>,
    exercises: Vec<Exercise>,
    templates: Vec<PromptTemplate>,
}

impl Catalogue {
    /// Build a catalogue, ordering chapters by number.
    pub fn new(
        mut chapters: Vec<Chapter>,
        prompts: Vec<BookPrompt>,
        exercises: Vec<Exercise>,
        templates: Vec<PromptTemplate>,
    ) -> Self {
        chapters.sort_by_key(|chapter| chapter.number);
        Self {
            chapters,
            prompts,
            exercises,
            templates,
        }
    }

    /// Chapters ordered by number.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn find_chapter(&self, number: u16) -> Option<&Chapter> {
        self.chapters.iter().find(|chapter| chapter.number == number)
    }

    /// Book prompts, optionally restricted to one chapter.
    pub fn prompts(&self, chapter: Option<u16>) -> Vec<BookPrompt> {
        self.prompts
            .iter()
            .filter(|prompt| chapter.is_none_or(|number| prompt.chapter_number == number))
            .cloned()
            .collect()
    }

    /// Exercises, optionally restricted to one chapter.
    pub fn exercises(&self, chapter: Option<u16>) -> Vec<Exercise> {
        self.exercises
            .iter()
            .filter(|exercise| chapter.is_none_or(|number| exercise.chapter_number == number))
            .cloned()
            .collect()
    }

    pub fn find_exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|exercise| exercise.id == id)
    }

    /// Templates, optionally restricted to one category.
    pub fn templates(&self, category: Option<&str>) -> Vec<PromptTemplate> {
        self.templates
            .iter()
            .filter(|template| category.is_none_or(|wanted| template.category == wanted))
            .cloned()
            .collect()
    }

    /// Templates matching a free-text query.
    pub fn search_templates(&self, query: &str) -> Vec<PromptTemplate> {
        search_templates(&self.templates, query)
            .into_iter()
            .cloned()
            .collect()
    }
}
