//! Bundled content tier.
//!
//! Maps the `book-content` seeds into domain catalogue types. The bundle is
//! validated when it loads, so field configs map one-to-one.

use book_content::{
    ChapterSeed, ContentBundle, ContentError, ExerciseSeed, FieldKindSeed, FieldSeed, PromptSeed,
    TemplateSeed,
};
use tracing::debug;

use crate::domain::{
    BookPrompt, Catalogue, Chapter, Exercise, ExerciseField, FieldKind, PromptTemplate,
};

/// Load the embedded bundle as a [`Catalogue`].
///
/// # Examples
/// ```
/// use companion::outbound::bundled::bundled_catalogue;
///
/// let catalogue = bundled_catalogue().expect("embedded bundle is valid");
/// assert!(catalogue.find_exercise("ex-1-starting-point").is_some());
/// ```
pub fn bundled_catalogue() -> Result<Catalogue, ContentError> {
    let bundle = ContentBundle::bundled()?;
    Ok(catalogue_from_bundle(&bundle))
}

/// Map an already-loaded bundle into a [`Catalogue`].
pub fn catalogue_from_bundle(bundle: &ContentBundle) -> Catalogue {
    let catalogue = Catalogue::new(
        bundle.chapters().iter().map(chapter).collect(),
        bundle.prompts().iter().map(prompt).collect(),
        bundle.exercises().iter().map(exercise).collect(),
        bundle.templates().iter().map(template).collect(),
    );
    debug!(
        chapters = catalogue.chapters().len(),
        "bundled catalogue loaded"
    );
    catalogue
}

fn chapter(seed: &ChapterSeed) -> Chapter {
    Chapter {
        number: seed.number,
        title: seed.title.clone(),
        summary: seed.summary.clone(),
        key_takeaways: seed.key_takeaways.clone(),
        reading_minutes: seed.reading_minutes,
    }
}

fn prompt(seed: &PromptSeed) -> BookPrompt {
    BookPrompt {
        id: seed.id.clone(),
        chapter_number: seed.chapter_number,
        title: seed.title.clone(),
        body: seed.body.clone(),
        category: seed.category.clone(),
        tags: seed.tags.clone(),
    }
}

fn exercise(seed: &ExerciseSeed) -> Exercise {
    Exercise {
        id: seed.id.clone(),
        chapter_number: seed.chapter_number,
        title: seed.title.clone(),
        description: seed.description.clone(),
        estimated_minutes: seed.estimated_minutes,
        fields: seed.fields.iter().map(field).collect(),
    }
}

fn field(seed: &FieldSeed) -> ExerciseField {
    ExerciseField {
        id: seed.id.clone(),
        label: seed.label.clone(),
        required: seed.required,
        kind: field_kind(&seed.kind),
    }
}

fn field_kind(seed: &FieldKindSeed) -> FieldKind {
    match seed.clone() {
        FieldKindSeed::Text { placeholder } => FieldKind::Text { placeholder },
        FieldKindSeed::LongText {
            placeholder,
            max_length,
        } => FieldKind::LongText {
            placeholder,
            max_length,
        },
        FieldKindSeed::SingleChoice { options } => FieldKind::SingleChoice { options },
        FieldKindSeed::MultipleChoice {
            options,
            max_selections,
        } => FieldKind::MultipleChoice {
            options,
            max_selections,
        },
        FieldKindSeed::Scale {
            min,
            max,
            min_label,
            max_label,
        } => FieldKind::Scale {
            min,
            max,
            min_label,
            max_label,
        },
        FieldKindSeed::Checklist { items } => FieldKind::Checklist { items },
    }
}

fn template(seed: &TemplateSeed) -> PromptTemplate {
    PromptTemplate {
        id: seed.id.clone(),
        title: seed.title.clone(),
        description: seed.description.clone(),
        category: seed.category.clone(),
        body: seed.body.clone(),
        tags: seed.tags.clone(),
        difficulty: seed.difficulty.clone(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn every_bundled_field_passes_domain_validation() {
        let catalogue = bundled_catalogue().expect("bundle");
        for exercise in catalogue.exercises(None) {
            for field in &exercise.fields {
                assert_eq!(field.validate(), Ok(()), "{}/{}", exercise.id, field.id);
            }
        }
    }

    #[rstest]
    fn mapped_fields_match_their_wire_shape() {
        let bundle = ContentBundle::bundled().expect("bundle");
        let catalogue = catalogue_from_bundle(&bundle);
        for (seed, mapped) in bundle.exercises().iter().zip(catalogue.exercises(None)) {
            let seed_json = serde_json::to_value(&seed.fields).expect("seed json");
            let mapped_json = serde_json::to_value(&mapped.fields).expect("mapped json");
            assert_eq!(seed_json, mapped_json, "{}", seed.id);
        }
    }

    #[rstest]
    #[case(1, "ex-1-starting-point")]
    #[case(6, "ex-6-monthly-goal")]
    fn chapters_own_their_exercises(#[case] chapter: u16, #[case] exercise_id: &str) {
        let catalogue = bundled_catalogue().expect("bundle");
        let ids: Vec<String> = catalogue
            .exercises(Some(chapter))
            .into_iter()
            .map(|exercise| exercise.id)
            .collect();
        assert_eq!(ids, vec![exercise_id.to_owned()]);
    }
}
