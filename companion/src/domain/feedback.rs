//! Community feedback on prompts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PromptRef, UserId};

/// Maximum feedback length in characters.
pub const FEEDBACK_TEXT_MAX: usize = 2000;

/// Validation errors for feedback submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackValidationError {
    EmptyText,
    TextTooLong { max: usize },
}

impl fmt::Display for FeedbackValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => f.write_str("feedback must not be blank"),
            Self::TextTooLong { max } => write!(f, "feedback must be at most {max} characters"),
        }
    }
}

impl std::error::Error for FeedbackValidationError {}

/// What kind of feedback a user is leaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    Improvement,
    Variation,
    Issue,
    Success,
}

impl FeedbackCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Improvement => "improvement",
            Self::Variation => "variation",
            Self::Issue => "issue",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a feedback category from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFeedbackCategoryError;

impl fmt::Display for ParseFeedbackCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid feedback category")
    }
}

impl std::error::Error for ParseFeedbackCategoryError {}

impl FromStr for FeedbackCategory {
    type Err = ParseFeedbackCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "improvement" => Ok(Self::Improvement),
            "variation" => Ok(Self::Variation),
            "issue" => Ok(Self::Issue),
            "success" => Ok(Self::Success),
            _ => Err(ParseFeedbackCategoryError),
        }
    }
}

/// Validated feedback ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub user_id: UserId,
    pub prompt: PromptRef,
    pub category: FeedbackCategory,
    pub text: String,
}

impl NewFeedback {
    /// Trim and validate the text.
    pub fn new(
        user_id: UserId,
        prompt: PromptRef,
        category: FeedbackCategory,
        text: &str,
    ) -> Result<Self, FeedbackValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(FeedbackValidationError::EmptyText);
        }
        if trimmed.chars().count() > FEEDBACK_TEXT_MAX {
            return Err(FeedbackValidationError::TextTooLong {
                max: FEEDBACK_TEXT_MAX,
            });
        }
        Ok(Self {
            user_id,
            prompt,
            category,
            text: trimmed.to_owned(),
        })
    }
}

/// Stored feedback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: UserId,
    pub prompt: PromptRef,
    pub category: FeedbackCategory,
    pub text: String,
    pub helpful_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Order feedback most helpful first, newest first among ties.
pub fn sort_feedback(entries: &mut [Feedback]) {
    entries.sort_by(|a, b| {
        b.helpful_count
            .cmp(&a.helpful_count)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
