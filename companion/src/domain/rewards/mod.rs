//! Gamification: points ledger, levels, and achievements.
//!
//! Points only ever accumulate. A user's level, progress, and badges are
//! derived from the ledger on read.

use std::collections::BTreeSet;

use serde::Serialize;

mod achievements;
mod ledger;
mod levels;
mod metrics;

pub use achievements::{ACHIEVEMENTS, Achievement, evaluate_achievements, find_achievement};
pub use ledger::{ParseRewardActionError, RewardAction, RewardEntry, total_points};
pub use levels::{LEVEL_TABLE, Level, LevelProgress, LevelTier, level_for_points, level_progress};
pub use metrics::{UserMetrics, reading_percent};

/// Ids of achievements already recorded in the ledger.
pub fn granted_achievement_ids(entries: &[RewardEntry]) -> BTreeSet<String> {
    entries
        .iter()
        .filter(|entry| entry.action == RewardAction::AchievementUnlocked)
        .filter_map(|entry| entry.reference_id.clone())
        .collect()
}

/// A user's standing derived from their ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardSummary {
    pub total_points: u64,
    pub progress: LevelProgress,
    /// Badges in the order they were granted.
    pub badges: Vec<String>,
}

impl RewardSummary {
    /// Summarise ledger entries.
    pub fn from_ledger(entries: &[RewardEntry]) -> Self {
        let total = total_points(entries);
        let mut ordered: Vec<&RewardEntry> = entries.iter().collect();
        ordered.sort_by_key(|entry| entry.created_at);
        let badges = ordered
            .into_iter()
            .filter_map(|entry| entry.badge.clone())
            .collect();
        Self {
            total_points: total,
            progress: level_progress(total),
            badges,
        }
    }

    /// Current level.
    pub fn level(&self) -> Level {
        self.progress.level
    }
}
