//! Catalogue query and field config tests.

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;

fn chapter(number: u16) -> Chapter {
    Chapter {
        number,
        title: format!("Chapter {number}"),
        summary: "summary".to_owned(),
        key_takeaways: Vec::new(),
        reading_minutes: 10,
    }
}

fn template(id: &str, category: &str, title: &str, tags: &[&str]) -> PromptTemplate {
    PromptTemplate {
        id: id.to_owned(),
        title: title.to_owned(),
        description: format!("{title} for busy people"),
        category: category.to_owned(),
        body: "Do the thing with [input]".to_owned(),
        tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
        difficulty: None,
    }
}

#[fixture]
fn catalogue() -> Catalogue {
    let prompt = |id: &str, chapter_number| BookPrompt {
        id: id.to_owned(),
        chapter_number,
        title: id.to_owned(),
        body: "body".to_owned(),
        category: "writing".to_owned(),
        tags: Vec::new(),
    };
    Catalogue::new(
        vec![chapter(3), chapter(1), chapter(2)],
        vec![prompt("a", 1), prompt("b", 3), prompt("c", 3)],
        Vec::new(),
        vec![
            template("lib-email", "communication", "Email reply", &["drafting"]),
            template("lib-plan", "research", "Research plan", &["Planning"]),
        ],
    )
}

#[rstest]
fn chapters_are_ordered_by_number(catalogue: Catalogue) {
    let numbers: Vec<u16> = catalogue.chapters().iter().map(|c| c.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(catalogue.find_chapter(2).map(|c| c.number), Some(2));
    assert!(catalogue.find_chapter(9).is_none());
}

#[rstest]
#[case(None, 3)]
#[case(Some(3), 2)]
#[case(Some(2), 0)]
fn prompts_filter_by_chapter(
    catalogue: Catalogue,
    #[case] chapter: Option<u16>,
    #[case] expected: usize,
) {
    assert_eq!(catalogue.prompts(chapter).len(), expected);
}

#[rstest]
#[case("plan", &["lib-plan"])]
#[case("DRAFTING", &["lib-email"])]
#[case("busy", &["lib-email", "lib-plan"])]
#[case("  ", &["lib-email", "lib-plan"])]
#[case("budget", &[])]
fn search_covers_title_description_and_tags(
    catalogue: Catalogue,
    #[case] query: &str,
    #[case] expected: &[&str],
) {
    let ids: Vec<String> = catalogue
        .search_templates(query)
        .into_iter()
        .map(|template| template.id)
        .collect();
    assert_eq!(ids, expected);
}

#[rstest]
fn templates_filter_by_category(catalogue: Catalogue) {
    assert_eq!(catalogue.templates(Some("research")).len(), 1);
    assert_eq!(catalogue.templates(None).len(), 2);
}

#[rstest]
#[case(json!({"id": "a", "label": "A", "type": "text"}))]
#[case(json!({"id": "a", "label": "A", "type": "long_text", "maxLength": 500}))]
#[case(json!({"id": "a", "label": "A", "type": "multiple_choice", "options": ["x"], "maxSelections": 1}))]
#[case(json!({"id": "a", "label": "A", "type": "checklist", "items": ["x", "y"]}))]
fn valid_field_configs_decode(#[case] raw: serde_json::Value) {
    assert!(ExerciseField::from_value(raw).is_ok());
}

#[rstest]
#[case(json!({"id": "a", "label": "A", "type": "slider"}), "unrecognised")]
#[case(json!({"id": "a", "label": "A"}), "unrecognised")]
#[case(json!({"id": " ", "label": "A", "type": "text"}), "id")]
#[case(json!({"id": "a", "label": "A", "type": "single_choice", "options": []}), "at least one")]
#[case(json!({"id": "a", "label": "A", "type": "scale", "min": 5, "max": 5}), "below")]
#[case(json!({"id": "a", "label": "A", "type": "multiple_choice", "options": ["x"], "maxSelections": 0}), "at least 1")]
fn invalid_field_configs_are_rejected(#[case] raw: serde_json::Value, #[case] fragment: &str) {
    let err = ExerciseField::from_value(raw).expect_err("config should be rejected");
    assert!(
        err.to_string().contains(fragment),
        "{err} should mention {fragment}"
    );
}
