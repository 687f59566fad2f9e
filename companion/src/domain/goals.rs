//! User goals and their milestones.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Maximum goal title length in characters.
pub const GOAL_TITLE_MAX: usize = 200;

/// Validation errors for goal and milestone input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => f.write_str("title must not be blank"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
        }
    }
}

impl std::error::Error for GoalValidationError {}

/// Goal lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }
}

/// Error returned when parsing a goal status from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseGoalStatusError;

impl fmt::Display for ParseGoalStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid goal status")
    }
}

impl std::error::Error for ParseGoalStatusError {}

impl FromStr for GoalStatus {
    type Err = ParseGoalStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "paused" => Ok(Self::Paused),
            _ => Err(ParseGoalStatusError),
        }
    }
}

/// Validate a goal or milestone title, returning it trimmed.
pub fn validate_title(title: &str) -> Result<String, GoalValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(GoalValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > GOAL_TITLE_MAX {
        return Err(GoalValidationError::TitleTooLong {
            max: GOAL_TITLE_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Input for creating a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub target_date: Option<NaiveDate>,
}

/// Validated goal ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub target_date: Option<NaiveDate>,
}

impl NewGoal {
    pub fn from_draft(user_id: UserId, draft: GoalDraft) -> Result<Self, GoalValidationError> {
        Ok(Self {
            user_id,
            title: validate_title(&draft.title)?,
            description: non_blank(draft.description),
            category: non_blank(draft.category),
            target_date: draft.target_date,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// A checkpoint within a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub title: String,
    pub completed: bool,
    pub position: u32,
}

/// A stored goal with its milestones ordered by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub status: GoalStatus,
    pub milestones: Vec<Milestone>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Completed milestones as a whole percentage; 0 without milestones.
    pub fn progress_percent(&self) -> u8 {
        let completed = self.milestones.iter().filter(|m| m.completed).count();
        goal_progress_percent(completed, self.milestones.len())
    }

    /// Every milestone is done but the goal is not yet marked complete.
    pub fn is_ready_to_complete(&self) -> bool {
        self.status != GoalStatus::Completed
            && !self.milestones.is_empty()
            && self.milestones.iter().all(|m| m.completed)
    }

    /// Next position for an appended milestone.
    pub fn next_milestone_position(&self) -> u32 {
        self.milestones
            .iter()
            .map(|m| m.position + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Rounded percentage of `completed` over `total`.
///
/// # Examples
/// ```
/// use companion::domain::goal_progress_percent;
///
/// assert_eq!(goal_progress_percent(0, 0), 0);
/// assert_eq!(goal_progress_percent(1, 3), 33);
/// assert_eq!(goal_progress_percent(2, 3), 67);
/// ```
pub fn goal_progress_percent(completed: usize, total: usize) -> u8 {
    super::rewards::reading_percent(completed, total)
}
