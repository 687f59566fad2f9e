//! Rewards service: awards points, grants achievements, and summarises
//! standing from the ledger.

use std::collections::BTreeSet;
use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tracing::info;

use crate::domain::ports::{RewardLedger, RewardLedgerError};
use crate::domain::{
    Achievement, Error, RewardAction, RewardEntry, RewardSummary, UserId, UserMetrics,
    evaluate_achievements, granted_achievement_ids, reading_percent,
};

fn map_ledger_error(error: RewardLedgerError) -> Error {
    match error {
        RewardLedgerError::Connection { message } => {
            Error::service_unavailable(format!("reward ledger unavailable: {message}"))
        }
        RewardLedgerError::Query { message } => {
            Error::internal(format!("reward ledger error: {message}"))
        }
        RewardLedgerError::Decode { message } => {
            Error::internal(format!("reward ledger returned malformed rows: {message}"))
        }
    }
}

/// Result of an award: the points entry plus any achievements it unlocked.
#[derive(Debug, Clone, PartialEq)]
pub struct AwardOutcome {
    pub entry: RewardEntry,
    pub unlocked: Vec<&'static Achievement>,
}

/// Chapters a user has finished, against the catalogue size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingProgress {
    pub completed: BTreeSet<u16>,
    pub total: usize,
    pub percent: u8,
}

/// Ledger-backed rewards service.
pub struct RewardsService<L> {
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
    total_chapters: usize,
}

impl<L> Clone for RewardsService<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            clock: Arc::clone(&self.clock),
            total_chapters: self.total_chapters,
        }
    }
}

impl<L> RewardsService<L>
where
    L: RewardLedger,
{
    /// `total_chapters` sizes the reading percentage used by achievements.
    pub fn new(ledger: Arc<L>, clock: Arc<dyn Clock>, total_chapters: usize) -> Self {
        Self {
            ledger,
            clock,
            total_chapters,
        }
    }

    /// Append an entry for `action`, then grant any newly met achievements.
    pub async fn award(
        &self,
        user_id: &UserId,
        action: RewardAction,
        reference_id: Option<String>,
    ) -> Result<AwardOutcome, Error> {
        let entry = RewardEntry::for_action(user_id.clone(), action, reference_id, self.clock.utc());
        self.ledger
            .append(&entry)
            .await
            .map_err(map_ledger_error)?;
        info!(
            user_id = %user_id,
            action = %action,
            points = entry.points,
            "points awarded"
        );
        let unlocked = self.grant_achievements(user_id).await?;
        Ok(AwardOutcome { entry, unlocked })
    }

    /// Award `action` unless an entry with the same action and reference
    /// already exists. Returns `None` when nothing was awarded.
    pub async fn award_once(
        &self,
        user_id: &UserId,
        action: RewardAction,
        reference_id: &str,
    ) -> Result<Option<AwardOutcome>, Error> {
        let entries = self.entries(user_id).await?;
        let already = entries
            .iter()
            .any(|entry| entry.action == action && entry.reference_id.as_deref() == Some(reference_id));
        if already {
            return Ok(None);
        }
        self.award(user_id, action, Some(reference_id.to_owned()))
            .await
            .map(Some)
    }

    /// Record a chapter as read. Repeat calls award nothing.
    pub async fn complete_chapter(
        &self,
        user_id: &UserId,
        chapter_number: u16,
    ) -> Result<Option<AwardOutcome>, Error> {
        self.award_once(
            user_id,
            RewardAction::ChapterCompleted,
            &chapter_number.to_string(),
        )
        .await
    }

    /// Evaluate achievements and append one ledger entry per new grant.
    ///
    /// Granted ids are read back from the ledger, so repeat calls are
    /// idempotent.
    pub async fn grant_achievements(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<&'static Achievement>, Error> {
        let entries = self.entries(user_id).await?;
        let metrics = self.metrics_from(&entries);
        let granted = granted_achievement_ids(&entries);
        let unlocked = evaluate_achievements(&metrics, &granted);

        for achievement in &unlocked {
            let entry = RewardEntry::achievement(
                user_id.clone(),
                achievement.id,
                achievement.badge,
                self.clock.utc(),
            );
            self.ledger
                .append(&entry)
                .await
                .map_err(map_ledger_error)?;
            info!(user_id = %user_id, achievement = achievement.id, "achievement unlocked");
        }
        Ok(unlocked)
    }

    /// Total points, level, progress, and badges.
    pub async fn summary(&self, user_id: &UserId) -> Result<RewardSummary, Error> {
        let entries = self.entries(user_id).await?;
        Ok(RewardSummary::from_ledger(&entries))
    }

    /// Activity metrics as achievements see them.
    pub async fn metrics(&self, user_id: &UserId) -> Result<UserMetrics, Error> {
        let entries = self.entries(user_id).await?;
        Ok(self.metrics_from(&entries))
    }

    /// Chapters recorded as completed.
    pub async fn reading_progress(&self, user_id: &UserId) -> Result<ReadingProgress, Error> {
        let entries = self.entries(user_id).await?;
        let completed: BTreeSet<u16> = entries
            .iter()
            .filter(|entry| entry.action == RewardAction::ChapterCompleted)
            .filter_map(|entry| entry.reference_id.as_deref())
            .filter_map(|reference| reference.parse().ok())
            .collect();
        Ok(ReadingProgress {
            percent: reading_percent(completed.len(), self.total_chapters),
            total: self.total_chapters,
            completed,
        })
    }

    async fn entries(&self, user_id: &UserId) -> Result<Vec<RewardEntry>, Error> {
        self.ledger
            .entries_for(user_id)
            .await
            .map_err(map_ledger_error)
    }

    fn metrics_from(&self, entries: &[RewardEntry]) -> UserMetrics {
        UserMetrics::from_ledger(entries, self.total_chapters, self.clock.utc().date_naive())
    }
}

#[cfg(test)]
#[path = "rewards_service_tests.rs"]
mod tests;
