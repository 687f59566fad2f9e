//! Exercise field configuration.
//!
//! Field configs arrive as JSON objects tagged by `type`. Anything that does
//! not decode into one of the known shapes, or decodes into a shape that
//! cannot be answered, is rejected here rather than at render time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reasons a field configuration is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldConfigError {
    /// JSON did not match any known field shape.
    UnknownShape { message: String },
    BlankId,
    BlankLabel,
    NoOptions,
    BlankOption,
    ZeroSelections,
    InvertedScale { min: u8, max: u8 },
}

impl fmt::Display for FieldConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownShape { message } => write!(f, "unrecognised field config: {message}"),
            Self::BlankId => f.write_str("field id must not be blank"),
            Self::BlankLabel => f.write_str("field label must not be blank"),
            Self::NoOptions => f.write_str("field must list at least one option"),
            Self::BlankOption => f.write_str("field options must not be blank"),
            Self::ZeroSelections => f.write_str("max selections must be at least 1"),
            Self::InvertedScale { min, max } => {
                write!(f, "scale minimum {min} must be below maximum {max}")
            }
        }
    }
}

impl std::error::Error for FieldConfigError {}

/// Shape of a field, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text {
        #[serde(default)]
        placeholder: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    LongText {
        #[serde(default)]
        placeholder: Option<String>,
        #[serde(default)]
        max_length: Option<u32>,
    },
    SingleChoice {
        options: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    MultipleChoice {
        options: Vec<String>,
        #[serde(default)]
        max_selections: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Scale {
        min: u8,
        max: u8,
        #[serde(default)]
        min_label: Option<String>,
        #[serde(default)]
        max_label: Option<String>,
    },
    Checklist {
        items: Vec<String>,
    },
}

/// One input of an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseField {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl ExerciseField {
    /// Decode and validate a raw JSON field config.
    ///
    /// # Examples
    /// ```
    /// use companion::domain::ExerciseField;
    /// use serde_json::json;
    ///
    /// let ok = ExerciseField::from_value(json!({
    ///     "id": "mood", "label": "Mood", "type": "scale", "min": 1, "max": 5
    /// }));
    /// assert!(ok.is_ok());
    ///
    /// let unknown = ExerciseField::from_value(json!({
    ///     "id": "x", "label": "X", "type": "slider"
    /// }));
    /// assert!(unknown.is_err());
    /// ```
    pub fn from_value(value: serde_json::Value) -> Result<Self, FieldConfigError> {
        let field: Self =
            serde_json::from_value(value).map_err(|err| FieldConfigError::UnknownShape {
                message: err.to_string(),
            })?;
        field.validate()?;
        Ok(field)
    }

    /// Check the decoded shape can be rendered and answered.
    pub fn validate(&self) -> Result<(), FieldConfigError> {
        if self.id.trim().is_empty() {
            return Err(FieldConfigError::BlankId);
        }
        if self.label.trim().is_empty() {
            return Err(FieldConfigError::BlankLabel);
        }
        match &self.kind {
            FieldKind::Text { .. } | FieldKind::LongText { .. } => Ok(()),
            FieldKind::SingleChoice { options } => check_options(options),
            FieldKind::MultipleChoice {
                options,
                max_selections,
            } => {
                check_options(options)?;
                if *max_selections == Some(0) {
                    return Err(FieldConfigError::ZeroSelections);
                }
                Ok(())
            }
            FieldKind::Scale { min, max, .. } if min >= max => {
                Err(FieldConfigError::InvertedScale {
                    min: *min,
                    max: *max,
                })
            }
            FieldKind::Scale { .. } => Ok(()),
            FieldKind::Checklist { items } => check_options(items),
        }
    }
}

fn check_options(options: &[String]) -> Result<(), FieldConfigError> {
    if options.is_empty() {
        return Err(FieldConfigError::NoOptions);
    }
    if options.iter().any(|option| option.trim().is_empty()) {
        return Err(FieldConfigError::BlankOption);
    }
    Ok(())
}
