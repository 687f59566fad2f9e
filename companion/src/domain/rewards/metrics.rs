//! Aggregate per-user metrics derived from the ledger.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::{RewardAction, RewardEntry};

/// Snapshot of user activity that achievement predicates read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetrics {
    pub chapters_completed: u32,
    pub exercises_completed: u32,
    pub prompts_rated: u32,
    pub feedback_given: u32,
    pub goals_created: u32,
    pub goals_completed: u32,
    pub stories_shared: u32,
    /// Completed chapters as a share of the catalogue, 0–100.
    pub reading_percent: u8,
    /// Consecutive days with activity, ending today or yesterday.
    pub streak_days: u32,
}

impl UserMetrics {
    /// Derive metrics from a user's ledger entries.
    ///
    /// Chapters count once per distinct reference. `total_chapters` is the
    /// catalogue size used for the reading percentage.
    pub fn from_ledger(entries: &[RewardEntry], total_chapters: usize, today: NaiveDate) -> Self {
        let mut metrics = Self::default();
        let mut chapters = BTreeSet::new();
        let mut active_days = BTreeSet::new();

        for entry in entries {
            if entry.action != RewardAction::AchievementUnlocked {
                active_days.insert(entry.created_at.date_naive());
            }
            match entry.action {
                RewardAction::ChapterCompleted => {
                    if let Some(reference) = &entry.reference_id {
                        chapters.insert(reference.as_str());
                    }
                }
                RewardAction::ExerciseCompleted => metrics.exercises_completed += 1,
                RewardAction::PromptRated => metrics.prompts_rated += 1,
                RewardAction::FeedbackSubmitted => metrics.feedback_given += 1,
                RewardAction::GoalCreated => metrics.goals_created += 1,
                RewardAction::GoalCompleted => metrics.goals_completed += 1,
                RewardAction::StoryShared => metrics.stories_shared += 1,
                RewardAction::MilestoneCompleted | RewardAction::AchievementUnlocked => {}
            }
        }

        metrics.chapters_completed = u32::try_from(chapters.len()).unwrap_or(u32::MAX);
        metrics.reading_percent = reading_percent(chapters.len(), total_chapters);
        metrics.streak_days = streak_days(&active_days, today);
        metrics
    }
}

/// Completed share of the catalogue rounded to a whole percentage.
pub fn reading_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let clamped = completed.min(total);
    let percent = (clamped * 200 + total) / (total * 2);
    u8::try_from(percent).unwrap_or(100)
}

fn streak_days(active_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let yesterday = today.checked_sub_days(Days::new(1));
    let start = if active_days.contains(&today) {
        Some(today)
    } else {
        yesterday.filter(|day| active_days.contains(day))
    };

    let mut streak = 0;
    let mut cursor = start;
    while let Some(day) = cursor.filter(|day| active_days.contains(day)) {
        streak += 1;
        cursor = day.checked_sub_days(Days::new(1));
    }
    streak
}
