//! Serialisable content records as they appear in a bundle.
//!
//! These types mirror the backend table rows closely but stay independent of
//! the companion domain so the crate can be consumed without pulling in the
//! service layer.

use serde::{Deserialize, Serialize};

/// A book chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSeed {
    /// One-based chapter number; unique within a bundle.
    pub number: u16,
    /// Chapter title.
    pub title: String,
    /// Short summary shown in chapter listings.
    pub summary: String,
    /// Key takeaways listed at the end of the chapter.
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    /// Estimated reading time in minutes.
    pub reading_minutes: u16,
}

/// A prompt printed in the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSeed {
    /// Stable prompt identifier.
    pub id: String,
    /// Chapter the prompt appears in.
    pub chapter_number: u16,
    /// Prompt title.
    pub title: String,
    /// Prompt text, possibly with `[placeholders]`.
    pub body: String,
    /// Free-form category label.
    pub category: String,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A structured exercise attached to a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSeed {
    /// Stable exercise identifier.
    pub id: String,
    /// Chapter the exercise belongs to.
    pub chapter_number: u16,
    /// Exercise title.
    pub title: String,
    /// Instructions shown above the fields.
    pub description: String,
    /// Optional time estimate in minutes.
    #[serde(default)]
    pub estimated_minutes: Option<u16>,
    /// Ordered field configurations.
    pub fields: Vec<FieldSeed>,
}

/// One input field of an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSeed {
    /// Field identifier; unique within its exercise.
    pub id: String,
    /// Label rendered next to the input.
    pub label: String,
    /// Whether an answer is required before completion.
    #[serde(default)]
    pub required: bool,
    /// Shape-specific configuration.
    #[serde(flatten)]
    pub kind: FieldKindSeed,
}

/// Shape-specific field configuration, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKindSeed {
    /// Single-line text input.
    Text {
        /// Placeholder hint.
        #[serde(default)]
        placeholder: Option<String>,
    },
    /// Multi-line text input.
    #[serde(rename_all = "camelCase")]
    LongText {
        /// Placeholder hint.
        #[serde(default)]
        placeholder: Option<String>,
        /// Optional character limit.
        #[serde(default)]
        max_length: Option<u32>,
    },
    /// Pick exactly one option.
    SingleChoice {
        /// Available options.
        options: Vec<String>,
    },
    /// Pick any number of options.
    #[serde(rename_all = "camelCase")]
    MultipleChoice {
        /// Available options.
        options: Vec<String>,
        /// Optional cap on selections.
        #[serde(default)]
        max_selections: Option<u32>,
    },
    /// Integer scale between two bounds, inclusive.
    #[serde(rename_all = "camelCase")]
    Scale {
        /// Lowest selectable value.
        min: u8,
        /// Highest selectable value.
        max: u8,
        /// Caption for the low end.
        #[serde(default)]
        min_label: Option<String>,
        /// Caption for the high end.
        #[serde(default)]
        max_label: Option<String>,
    },
    /// Tick-box list.
    Checklist {
        /// Items to tick.
        items: Vec<String>,
    },
}

/// A reusable template from the prompt library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSeed {
    /// Stable template identifier.
    pub id: String,
    /// Template title.
    pub title: String,
    /// One-line description.
    pub description: String,
    /// Library category.
    pub category: String,
    /// Template text.
    pub body: String,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional difficulty label.
    #[serde(default)]
    pub difficulty: Option<String>,
}
