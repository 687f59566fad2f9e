//! Exercise responses and answer validation.
//!
//! Answers are a JSON object keyed by field id. Values are checked against
//! the exercise's field configuration: choices must come from the configured
//! options and scale values must sit inside the configured bounds. Required
//! fields are only enforced when the response is marked complete, so drafts
//! can be saved part-way through. Keys with no matching field are kept as-is
//! and logged; the field may have been skipped when its remote config failed
//! to decode.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::{Exercise, ExerciseField, FieldKind, UserId};

/// Answers keyed by field id.
pub type Answers = Map<String, Value>;

/// Reasons a response does not fit its exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseValidationError {
    MissingRequired { field: String },
    WrongType { field: String, expected: &'static str },
    InvalidChoice { field: String, value: String },
    TooManySelections { field: String, max: u32 },
    TooLong { field: String, max: u32 },
    OutOfRange { field: String, value: i64, min: u8, max: u8 },
}

impl fmt::Display for ResponseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired { field } => write!(f, "field `{field}` is required"),
            Self::WrongType { field, expected } => {
                write!(f, "field `{field}` expects {expected}")
            }
            Self::InvalidChoice { field, value } => {
                write!(f, "`{value}` is not an option for field `{field}`")
            }
            Self::TooManySelections { field, max } => {
                write!(f, "field `{field}` allows at most {max} selections")
            }
            Self::TooLong { field, max } => {
                write!(f, "field `{field}` must be at most {max} characters")
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "field `{field}` value {value} is outside {min}..={max}"),
        }
    }
}

impl std::error::Error for ResponseValidationError {}

/// A user's answers to one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResponse {
    pub user_id: UserId,
    pub exercise_id: String,
    pub answers: Answers,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

/// Coerce a stored payload into an answers object.
///
/// Anything other than a JSON object is replaced with an empty object and
/// logged, so a corrupt row never blocks the exercise from loading.
///
/// # Examples
/// ```
/// use companion::domain::normalise_answers;
/// use serde_json::json;
///
/// assert!(normalise_answers("ex-1", json!("oops")).is_empty());
/// assert_eq!(normalise_answers("ex-1", json!({"goal": "x"})).len(), 1);
/// ```
pub fn normalise_answers(exercise_id: &str, payload: Value) -> Answers {
    match payload {
        Value::Object(map) => map,
        Value::Null => Answers::new(),
        other => {
            warn!(
                exercise_id,
                payload_kind = value_kind(&other),
                "stored exercise response is not an object; using empty answers"
            );
            Answers::new()
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check `answers` against the exercise's field configuration.
pub fn validate_response(
    exercise: &Exercise,
    answers: &Answers,
    completed: bool,
) -> Result<(), ResponseValidationError> {
    for unknown in answers.keys().filter(|key| exercise.field(key).is_none()) {
        warn!(
            exercise_id = %exercise.id,
            field = %unknown,
            "answer has no matching field; keeping it unchecked"
        );
    }

    for field in &exercise.fields {
        match answers.get(&field.id).filter(|value| !is_blank(value)) {
            Some(value) => check_value(field, value)?,
            None if completed && field.required => {
                return Err(ResponseValidationError::MissingRequired {
                    field: field.id.clone(),
                });
            }
            None => {}
        }
    }
    Ok(())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn check_value(field: &ExerciseField, value: &Value) -> Result<(), ResponseValidationError> {
    let id = || field.id.clone();
    match &field.kind {
        FieldKind::Text { .. } => expect_str(field, value).map(|_| ()),
        FieldKind::LongText { max_length, .. } => {
            let text = expect_str(field, value)?;
            match max_length {
                Some(max) if text.chars().count() > usize::try_from(*max).unwrap_or(usize::MAX) => {
                    Err(ResponseValidationError::TooLong {
                        field: id(),
                        max: *max,
                    })
                }
                _ => Ok(()),
            }
        }
        FieldKind::SingleChoice { options } => {
            let choice = expect_str(field, value)?;
            check_choice(field, options, choice)
        }
        FieldKind::MultipleChoice {
            options,
            max_selections,
        } => {
            let picks = expect_str_list(field, value)?;
            if let Some(max) = max_selections
                && picks.len() > usize::try_from(*max).unwrap_or(usize::MAX)
            {
                return Err(ResponseValidationError::TooManySelections {
                    field: id(),
                    max: *max,
                });
            }
            picks
                .into_iter()
                .try_for_each(|pick| check_choice(field, options, pick))
        }
        FieldKind::Scale { min, max, .. } => {
            let number = value
                .as_i64()
                .ok_or(ResponseValidationError::WrongType {
                    field: id(),
                    expected: "an integer",
                })?;
            if (i64::from(*min)..=i64::from(*max)).contains(&number) {
                Ok(())
            } else {
                Err(ResponseValidationError::OutOfRange {
                    field: id(),
                    value: number,
                    min: *min,
                    max: *max,
                })
            }
        }
        FieldKind::Checklist { items } => expect_str_list(field, value)?
            .into_iter()
            .try_for_each(|item| check_choice(field, items, item)),
    }
}

fn expect_str<'a>(field: &ExerciseField, value: &'a Value) -> Result<&'a str, ResponseValidationError> {
    value.as_str().ok_or_else(|| ResponseValidationError::WrongType {
        field: field.id.clone(),
        expected: "text",
    })
}

fn expect_str_list<'a>(
    field: &ExerciseField,
    value: &'a Value,
) -> Result<Vec<&'a str>, ResponseValidationError> {
    let wrong_type = || ResponseValidationError::WrongType {
        field: field.id.clone(),
        expected: "a list of text values",
    };
    value
        .as_array()
        .ok_or_else(wrong_type)?
        .iter()
        .map(|item| item.as_str().ok_or_else(wrong_type))
        .collect()
}

fn check_choice(
    field: &ExerciseField,
    options: &[String],
    choice: &str,
) -> Result<(), ResponseValidationError> {
    if options.iter().any(|option| option == choice) {
        Ok(())
    } else {
        Err(ResponseValidationError::InvalidChoice {
            field: field.id.clone(),
            value: choice.to_owned(),
        })
    }
}
