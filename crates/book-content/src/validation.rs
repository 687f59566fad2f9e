//! Structural checks applied to parsed bundles.

use std::collections::HashSet;

use crate::error::ContentError;
use crate::seed::{ChapterSeed, ExerciseSeed, FieldKindSeed, FieldSeed, PromptSeed, TemplateSeed};

/// Reject duplicate chapter numbers and return the set of known numbers.
pub(crate) fn chapter_numbers(chapters: &[ChapterSeed]) -> Result<HashSet<u16>, ContentError> {
    if chapters.is_empty() {
        return Err(ContentError::EmptyChapters);
    }
    let mut seen = HashSet::with_capacity(chapters.len());
    for chapter in chapters {
        if !seen.insert(chapter.number) {
            return Err(ContentError::DuplicateChapter {
                number: chapter.number,
            });
        }
    }
    Ok(seen)
}

pub(crate) fn prompts(prompts: &[PromptSeed], chapters: &HashSet<u16>) -> Result<(), ContentError> {
    unique_ids("prompt", prompts.iter().map(|prompt| prompt.id.as_str()))?;
    for prompt in prompts {
        known_chapter("prompt", &prompt.id, prompt.chapter_number, chapters)?;
    }
    Ok(())
}

pub(crate) fn exercises(
    exercises: &[ExerciseSeed],
    chapters: &HashSet<u16>,
) -> Result<(), ContentError> {
    unique_ids(
        "exercise",
        exercises.iter().map(|exercise| exercise.id.as_str()),
    )?;
    for exercise in exercises {
        known_chapter("exercise", &exercise.id, exercise.chapter_number, chapters)?;
        let mut field_ids = HashSet::with_capacity(exercise.fields.len());
        for field in &exercise.fields {
            let invalid = |reason: &str| ContentError::InvalidField {
                exercise_id: exercise.id.clone(),
                field_id: field.id.clone(),
                reason: reason.to_owned(),
            };
            if !field_ids.insert(field.id.as_str()) {
                return Err(invalid("field id repeated within exercise"));
            }
            check_field(field).map_err(invalid)?;
        }
    }
    Ok(())
}

pub(crate) fn templates(templates: &[TemplateSeed]) -> Result<(), ContentError> {
    unique_ids(
        "template",
        templates.iter().map(|template| template.id.as_str()),
    )
}

/// Validate one field configuration.
///
/// Returns a human-readable reason when the shape cannot be rendered or
/// answered meaningfully.
pub fn check_field(field: &FieldSeed) -> Result<(), &'static str> {
    if field.id.trim().is_empty() {
        return Err("field id must not be blank");
    }
    if field.label.trim().is_empty() {
        return Err("field label must not be blank");
    }
    match &field.kind {
        FieldKindSeed::Text { .. } | FieldKindSeed::LongText { .. } => Ok(()),
        FieldKindSeed::SingleChoice { options } => non_blank_list(options, "options"),
        FieldKindSeed::MultipleChoice {
            options,
            max_selections,
        } => {
            non_blank_list(options, "options")?;
            match max_selections {
                Some(0) => Err("max selections must be at least 1"),
                _ => Ok(()),
            }
        }
        FieldKindSeed::Scale { min, max, .. } => {
            if min < max {
                Ok(())
            } else {
                Err("scale minimum must be below maximum")
            }
        }
        FieldKindSeed::Checklist { items } => non_blank_list(items, "items"),
    }
}

fn non_blank_list(values: &[String], what: &'static str) -> Result<(), &'static str> {
    if values.is_empty() {
        return Err(match what {
            "items" => "checklist must list at least one item",
            _ => "choice field must list at least one option",
        });
    }
    if values.iter().any(|value| value.trim().is_empty()) {
        return Err(match what {
            "items" => "checklist items must not be blank",
            _ => "choice options must not be blank",
        });
    }
    Ok(())
}

fn unique_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                kind,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}

fn known_chapter(
    kind: &'static str,
    id: &str,
    chapter_number: u16,
    chapters: &HashSet<u16>,
) -> Result<(), ContentError> {
    if chapters.contains(&chapter_number) {
        Ok(())
    } else {
        Err(ContentError::UnknownChapter {
            kind,
            id: id.to_owned(),
            chapter_number,
        })
    }
}
