//! Append-only points ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Actions that earn points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardAction {
    ChapterCompleted,
    ExerciseCompleted,
    PromptRated,
    FeedbackSubmitted,
    GoalCreated,
    MilestoneCompleted,
    GoalCompleted,
    StoryShared,
    /// Carries an achievement badge; worth no points on its own.
    AchievementUnlocked,
}

impl RewardAction {
    /// Every action, in display order.
    pub const ALL: [Self; 9] = [
        Self::ChapterCompleted,
        Self::ExerciseCompleted,
        Self::PromptRated,
        Self::FeedbackSubmitted,
        Self::GoalCreated,
        Self::MilestoneCompleted,
        Self::GoalCompleted,
        Self::StoryShared,
        Self::AchievementUnlocked,
    ];

    /// Points awarded for the action.
    pub fn points(self) -> u32 {
        match self {
            Self::ChapterCompleted => 100,
            Self::ExerciseCompleted => 50,
            Self::PromptRated => 10,
            Self::FeedbackSubmitted => 15,
            Self::GoalCreated => 20,
            Self::MilestoneCompleted => 25,
            Self::GoalCompleted => 75,
            Self::StoryShared => 40,
            Self::AchievementUnlocked => 0,
        }
    }

    /// Wire representation used in the `action_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChapterCompleted => "chapter_completed",
            Self::ExerciseCompleted => "exercise_completed",
            Self::PromptRated => "prompt_rated",
            Self::FeedbackSubmitted => "feedback_submitted",
            Self::GoalCreated => "goal_created",
            Self::MilestoneCompleted => "milestone_completed",
            Self::GoalCompleted => "goal_completed",
            Self::StoryShared => "story_shared",
            Self::AchievementUnlocked => "achievement_unlocked",
        }
    }
}

/// Error returned when parsing a reward action from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseRewardActionError;

impl fmt::Display for ParseRewardActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid reward action")
    }
}

impl std::error::Error for ParseRewardActionError {}

impl fmt::Display for RewardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardAction {
    type Err = ParseRewardActionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or(ParseRewardActionError)
    }
}

/// Immutable ledger record.
///
/// Entries are only ever appended; totals are recomputed by summing, never
/// by adjusting a stored balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardEntry {
    pub user_id: UserId,
    pub action: RewardAction,
    pub points: u32,
    pub badge: Option<String>,
    /// What the award was for, e.g. a chapter number or prompt reference.
    pub reference_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RewardEntry {
    /// Build an entry worth the action's standard points.
    pub fn for_action(
        user_id: UserId,
        action: RewardAction,
        reference_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            action,
            points: action.points(),
            badge: None,
            reference_id,
            created_at: now,
        }
    }

    /// Build the zero-point entry recording an unlocked achievement.
    pub fn achievement(
        user_id: UserId,
        achievement_id: &str,
        badge: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            action: RewardAction::AchievementUnlocked,
            points: RewardAction::AchievementUnlocked.points(),
            badge: Some(badge.to_owned()),
            reference_id: Some(achievement_id.to_owned()),
            created_at: now,
        }
    }
}

/// Sum the points of every entry.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use companion::domain::{RewardAction, RewardEntry, UserId, total_points};
///
/// let user = UserId::random();
/// let entries = vec![
///     RewardEntry::for_action(user.clone(), RewardAction::ChapterCompleted, None, Utc::now()),
///     RewardEntry::for_action(user, RewardAction::PromptRated, None, Utc::now()),
/// ];
/// assert_eq!(total_points(&entries), 110);
/// ```
pub fn total_points(entries: &[RewardEntry]) -> u64 {
    entries.iter().map(|entry| u64::from(entry.points)).sum()
}
