//! Content bundle type and JSON parsing.
//!
//! A bundle is the full set of read-only reference data the companion ships
//! with: chapters, book prompts, exercises, and prompt-library templates. The
//! copy compiled into the crate doubles as the fallback tier whenever the
//! hosted backend cannot be reached.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ContentError;
use crate::seed::{ChapterSeed, ExerciseSeed, PromptSeed, TemplateSeed};
use crate::validation;

/// Current supported bundle version.
const SUPPORTED_VERSION: u32 = 1;

/// Bundle JSON compiled into the crate.
const BUNDLED_JSON: &str = include_str!("../data/content.json");

/// Validated, read-only content bundle.
///
/// # Example
///
/// ```
/// use book_content::ContentBundle;
///
/// let json = r#"{
///     "version": 1,
///     "chapters": [
///         {"number": 1, "title": "Start", "summary": "Why now", "readingMinutes": 12}
///     ],
///     "prompts": [],
///     "exercises": [],
///     "templates": []
/// }"#;
///
/// let bundle = ContentBundle::from_json(json).expect("valid bundle");
/// assert_eq!(bundle.chapters().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBundle {
    version: u32,
    chapters: Vec<ChapterSeed>,
    prompts: Vec<PromptSeed>,
    exercises: Vec<ExerciseSeed>,
    templates: Vec<TemplateSeed>,
}

impl ContentBundle {
    /// Parse the bundle compiled into this crate.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the embedded JSON fails validation. The
    /// behavioural tests pin the embedded file, so this only fails when the
    /// data file is edited into an invalid state.
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_json(BUNDLED_JSON)
    }

    /// Parse a bundle from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if:
    /// - The JSON is malformed or a field config has an unknown `type`
    /// - The version is unsupported
    /// - Chapters are missing or duplicated
    /// - Identifiers repeat within a kind
    /// - A prompt or exercise references an unknown chapter
    /// - A field configuration is structurally invalid
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let raw: RawContentBundle =
            serde_json::from_str(json).map_err(|e| ContentError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Load a bundle from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ContentError> {
        let contents = fs::read_to_string(path).map_err(|e| ContentError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawContentBundle) -> Result<Self, ContentError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(ContentError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        let known_chapters = validation::chapter_numbers(&raw.chapters)?;
        validation::prompts(&raw.prompts, &known_chapters)?;
        validation::exercises(&raw.exercises, &known_chapters)?;
        validation::templates(&raw.templates)?;

        let mut chapters = raw.chapters;
        chapters.sort_by_key(|chapter| chapter.number);

        Ok(Self {
            version: raw.version,
            chapters,
            prompts: raw.prompts,
            exercises: raw.exercises,
            templates: raw.templates,
        })
    }

    /// Returns the bundle version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns chapters ordered by number.
    #[must_use]
    pub fn chapters(&self) -> &[ChapterSeed] {
        &self.chapters
    }

    /// Returns book prompts in bundle order.
    #[must_use]
    pub fn prompts(&self) -> &[PromptSeed] {
        &self.prompts
    }

    /// Returns exercises in bundle order.
    #[must_use]
    pub fn exercises(&self) -> &[ExerciseSeed] {
        &self.exercises
    }

    /// Returns prompt-library templates in bundle order.
    #[must_use]
    pub fn templates(&self) -> &[TemplateSeed] {
        &self.templates
    }

    /// Finds a chapter by number.
    #[must_use]
    pub fn find_chapter(&self, number: u16) -> Option<&ChapterSeed> {
        self.chapters.iter().find(|chapter| chapter.number == number)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContentBundle {
    version: u32,
    chapters: Vec<ChapterSeed>,
    #[serde(default)]
    prompts: Vec<PromptSeed>,
    #[serde(default)]
    exercises: Vec<ExerciseSeed>,
    #[serde(default)]
    templates: Vec<TemplateSeed>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::FieldKindSeed;

    #[test]
    fn embedded_bundle_is_valid() {
        let bundle = ContentBundle::bundled().expect("embedded bundle should parse");
        assert!(!bundle.chapters().is_empty());
        assert!(!bundle.prompts().is_empty());
        assert!(!bundle.exercises().is_empty());
        assert!(!bundle.templates().is_empty());
    }

    #[test]
    fn chapters_are_sorted_by_number() {
        let json = r#"{
            "version": 1,
            "chapters": [
                {"number": 2, "title": "Two", "summary": "", "readingMinutes": 5},
                {"number": 1, "title": "One", "summary": "", "readingMinutes": 5}
            ]
        }"#;
        let bundle = ContentBundle::from_json(json).expect("valid bundle");
        let numbers: Vec<u16> = bundle.chapters().iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn field_kinds_decode_from_type_tag() {
        let json = r#"{
            "version": 1,
            "chapters": [{"number": 1, "title": "One", "summary": "", "readingMinutes": 5}],
            "exercises": [{
                "id": "ex-1",
                "chapterNumber": 1,
                "title": "Audit",
                "description": "List tasks",
                "fields": [
                    {"id": "confidence", "label": "Confidence", "type": "scale", "min": 1, "max": 5},
                    {"id": "tools", "label": "Tools", "type": "multiple_choice",
                     "options": ["Chat", "Code"], "maxSelections": 1}
                ]
            }]
        }"#;
        let bundle = ContentBundle::from_json(json).expect("valid bundle");
        let fields = &bundle.exercises()[0].fields;
        assert!(matches!(
            fields[0].kind,
            FieldKindSeed::Scale { min: 1, max: 5, .. }
        ));
        assert!(matches!(
            fields[1].kind,
            FieldKindSeed::MultipleChoice {
                max_selections: Some(1),
                ..
            }
        ));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = ContentBundle::from_file(Path::new("/nonexistent/content.json"))
            .expect_err("missing file must fail");
        assert!(matches!(err, ContentError::IoError { .. }));
    }

    #[test]
    fn finds_chapter_by_number() {
        let bundle = ContentBundle::bundled().expect("embedded bundle should parse");
        let first = bundle.find_chapter(1).expect("chapter 1 exists");
        assert_eq!(first.number, 1);
        assert!(bundle.find_chapter(999).is_none());
    }
}
