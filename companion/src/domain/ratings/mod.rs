//! Prompt rating domain types.
//!
//! A rating scores a prompt on three dimensions (effectiveness, clarity, and
//! time value) on a 1–5 scale. The overall score is derived from the
//! dimensions with fixed weights and is never stored independently of them.
//! Quick ratings are the single-score shortcut offered on prompt cards.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

mod stats;
#[cfg(test)]
mod tests;

pub use stats::{QuickRatingSummary, RatingStats};

/// Maximum accepted length of a rating comment, in characters.
pub const RATING_COMMENT_MAX: usize = 1000;

/// Validation errors raised by rating constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingValidationError {
    ScoreOutOfRange { value: u8 },
    EmptyPromptId,
    CommentTooLong { max: usize },
}

impl fmt::Display for RatingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScoreOutOfRange { value } => {
                write!(f, "rating scores must be between 1 and 5 (got {value})")
            }
            Self::EmptyPromptId => write!(f, "prompt id must not be blank"),
            Self::CommentTooLong { max } => {
                write!(f, "rating comment must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for RatingValidationError {}

/// Where a rated prompt comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    /// A prompt printed in the book.
    Book,
    /// A template from the prompt library.
    Library,
    /// A prompt authored by a user.
    Custom,
}

/// Error returned when parsing a prompt kind from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsePromptKindError;

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PromptKind {
    /// Wire representation used in the `prompt_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Library => "library",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ParsePromptKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid prompt kind")
    }
}

impl std::error::Error for ParsePromptKindError {}

impl FromStr for PromptKind {
    type Err = ParsePromptKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "book" => Ok(Self::Book),
            "library" => Ok(Self::Library),
            "custom" => Ok(Self::Custom),
            _ => Err(ParsePromptKindError),
        }
    }
}

/// Reference to a prompt by identifier and kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRef {
    id: String,
    kind: PromptKind,
}

impl PromptRef {
    /// Build a prompt reference, rejecting blank identifiers.
    pub fn new(id: impl Into<String>, kind: PromptKind) -> Result<Self, RatingValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RatingValidationError::EmptyPromptId);
        }
        Ok(Self { id, kind })
    }

    /// Prompt identifier.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Prompt kind.
    pub fn kind(&self) -> PromptKind {
        self.kind
    }
}

impl fmt::Display for PromptRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A single 1–5 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DimensionScore(u8);

impl DimensionScore {
    /// Lowest accepted score.
    pub const MIN: u8 = 1;
    /// Highest accepted score.
    pub const MAX: u8 = 5;

    /// Validate a score.
    ///
    /// # Examples
    /// ```
    /// use companion::domain::DimensionScore;
    ///
    /// assert!(DimensionScore::new(5).is_ok());
    /// assert!(DimensionScore::new(6).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self, RatingValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingValidationError::ScoreOutOfRange { value })
        }
    }

    /// The raw score.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DimensionScore {
    type Error = RatingValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DimensionScore> for u8 {
    fn from(value: DimensionScore) -> Self {
        value.0
    }
}

/// Relative weight of each dimension in the overall score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingWeights {
    pub effectiveness: f64,
    pub clarity: f64,
    pub time_value: f64,
}

/// Weights applied to every rating; they sum to 1.0.
pub const RATING_WEIGHTS: RatingWeights = RatingWeights {
    effectiveness: 0.4,
    clarity: 0.3,
    time_value: 0.3,
};

/// The three dimension scores of one rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScores {
    pub effectiveness: DimensionScore,
    pub clarity: DimensionScore,
    pub time_value: DimensionScore,
}

impl DimensionScores {
    /// Validate three raw scores.
    pub fn new(effectiveness: u8, clarity: u8, time_value: u8) -> Result<Self, RatingValidationError> {
        Ok(Self {
            effectiveness: DimensionScore::new(effectiveness)?,
            clarity: DimensionScore::new(clarity)?,
            time_value: DimensionScore::new(time_value)?,
        })
    }

    /// Weighted overall score rounded to two decimals.
    ///
    /// # Examples
    /// ```
    /// use companion::domain::DimensionScores;
    ///
    /// let scores = DimensionScores::new(5, 4, 3).expect("valid scores");
    /// assert_eq!(scores.overall(), 4.1);
    /// ```
    pub fn overall(&self) -> f64 {
        let weights = RATING_WEIGHTS;
        round_to_hundredths(
            weights.effectiveness * f64::from(self.effectiveness.get())
                + weights.clarity * f64::from(self.clarity.get())
                + weights.time_value * f64::from(self.time_value.get()),
        )
    }
}

/// Unvalidated rating submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingDraft {
    pub prompt: PromptRef,
    pub effectiveness: u8,
    pub clarity: u8,
    pub time_value: u8,
    pub comment: Option<String>,
}

/// One user's rating of one prompt.
///
/// ## Invariants
/// - Exactly one rating exists per (user, prompt id, prompt kind).
/// - The overall score is always derived from the dimension scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRating {
    pub user_id: UserId,
    pub prompt: PromptRef,
    pub scores: DimensionScores,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PromptRating {
    /// Validate a draft submitted by `user_id` at `now`.
    pub fn from_draft(
        user_id: UserId,
        draft: RatingDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, RatingValidationError> {
        let scores = DimensionScores::new(draft.effectiveness, draft.clarity, draft.time_value)?;
        let comment = normalise_comment(draft.comment)?;
        Ok(Self {
            user_id,
            prompt: draft.prompt,
            scores,
            comment,
            created_at: now,
            updated_at: now,
        })
    }

    /// Weighted overall score.
    pub fn overall(&self) -> f64 {
        self.scores.overall()
    }
}

fn normalise_comment(comment: Option<String>) -> Result<Option<String>, RatingValidationError> {
    let Some(text) = comment else {
        return Ok(None);
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > RATING_COMMENT_MAX {
        return Err(RatingValidationError::CommentTooLong {
            max: RATING_COMMENT_MAX,
        });
    }
    Ok(Some(trimmed.to_owned()))
}

/// Single-score rating left from a prompt card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickRating {
    pub user_id: UserId,
    pub prompt: PromptRef,
    pub stars: DimensionScore,
    pub updated_at: DateTime<Utc>,
}

/// Round to two decimal places, half away from zero.
pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
