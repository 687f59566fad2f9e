//! Goal service: goals, milestones, and completion awards.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::domain::auth::require_user;
use crate::domain::ports::{AuthSession, GoalRepository, GoalRepositoryError, RewardLedger};
use crate::domain::{
    Error, Goal, GoalDraft, GoalStatus, Milestone, NewGoal, RewardAction, RewardsService, UserId,
    validate_title,
};

fn map_repository_error(error: GoalRepositoryError) -> Error {
    match error {
        GoalRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("goal repository unavailable: {message}"))
        }
        GoalRepositoryError::Query { message } => {
            Error::internal(format!("goal repository error: {message}"))
        }
        GoalRepositoryError::Decode { message } => {
            Error::internal(format!("goal repository returned malformed rows: {message}"))
        }
        GoalRepositoryError::Unauthorized { message } => {
            Error::unauthorized(format!("goal change not permitted: {message}"))
        }
    }
}

/// Goal state after a milestone toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneUpdate {
    pub goal: Goal,
    pub progress_percent: u8,
    /// Every milestone is done and the goal can be marked complete.
    pub ready_to_complete: bool,
}

pub struct GoalService<G, L> {
    goals: Arc<G>,
    rewards: RewardsService<L>,
    auth: Arc<dyn AuthSession>,
}

impl<G, L> GoalService<G, L>
where
    G: GoalRepository,
    L: RewardLedger,
{
    pub fn new(goals: Arc<G>, rewards: RewardsService<L>, auth: Arc<dyn AuthSession>) -> Self {
        Self {
            goals,
            rewards,
            auth,
        }
    }

    /// Create a goal for the signed-in user.
    pub async fn create(&self, draft: GoalDraft) -> Result<Goal, Error> {
        let user = require_user(self.auth.as_ref()).await?;
        let goal = NewGoal::from_draft(user.id.clone(), draft)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let stored = self
            .goals
            .create(&goal)
            .await
            .map_err(map_repository_error)?;
        self.award_quietly(&user.id, RewardAction::GoalCreated, stored.id)
            .await;
        Ok(stored)
    }

    /// The signed-in user's goals, newest first.
    pub async fn list(&self) -> Result<Vec<Goal>, Error> {
        let user = require_user(self.auth.as_ref()).await?;
        self.goals
            .list_for_user(&user.id)
            .await
            .map_err(map_repository_error)
    }

    /// Append a milestone after the existing ones.
    pub async fn add_milestone(&self, goal_id: Uuid, title: &str) -> Result<Milestone, Error> {
        let user = require_user(self.auth.as_ref()).await?;
        let title = validate_title(title).map_err(|err| Error::invalid_request(err.to_string()))?;
        let goal = self.owned_goal(&user.id, goal_id).await?;
        self.goals
            .add_milestone(goal.id, &title, goal.next_milestone_position())
            .await
            .map_err(map_repository_error)
    }

    /// Flip a milestone's completed flag.
    ///
    /// Completing a milestone awards points once per milestone; unticking and
    /// re-ticking does not award again.
    pub async fn toggle_milestone(
        &self,
        goal_id: Uuid,
        milestone_id: Uuid,
    ) -> Result<MilestoneUpdate, Error> {
        let user = require_user(self.auth.as_ref()).await?;
        let mut goal = self.owned_goal(&user.id, goal_id).await?;
        let milestone = goal
            .milestones
            .iter_mut()
            .find(|milestone| milestone.id == milestone_id)
            .ok_or_else(|| Error::not_found(format!("milestone {milestone_id} not found")))?;
        let completed = !milestone.completed;
        self.goals
            .set_milestone_completed(milestone_id, completed)
            .await
            .map_err(map_repository_error)?;
        milestone.completed = completed;

        if completed {
            self.award_once_quietly(&user.id, RewardAction::MilestoneCompleted, milestone_id)
                .await;
        }
        Ok(MilestoneUpdate {
            progress_percent: goal.progress_percent(),
            ready_to_complete: goal.is_ready_to_complete(),
            goal,
        })
    }

    /// Change a goal's status. Completing a goal awards points once.
    pub async fn update_status(&self, goal_id: Uuid, status: GoalStatus) -> Result<Goal, Error> {
        let user = require_user(self.auth.as_ref()).await?;
        let mut goal = self.owned_goal(&user.id, goal_id).await?;
        if goal.status == status {
            return Ok(goal);
        }
        self.goals
            .update_status(goal_id, status)
            .await
            .map_err(map_repository_error)?;
        goal.status = status;

        if status == GoalStatus::Completed {
            self.award_once_quietly(&user.id, RewardAction::GoalCompleted, goal_id)
                .await;
        }
        Ok(goal)
    }

    /// Delete one of the signed-in user's goals.
    pub async fn delete(&self, goal_id: Uuid) -> Result<(), Error> {
        let user = require_user(self.auth.as_ref()).await?;
        let removed = self
            .goals
            .delete(&user.id, goal_id)
            .await
            .map_err(map_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(format!("goal {goal_id} not found")))
        }
    }

    async fn owned_goal(&self, user_id: &UserId, goal_id: Uuid) -> Result<Goal, Error> {
        self.goals
            .find(user_id, goal_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("goal {goal_id} not found")))
    }

    async fn award_quietly(&self, user_id: &UserId, action: RewardAction, reference: Uuid) {
        if let Err(error) = self
            .rewards
            .award(user_id, action, Some(reference.to_string()))
            .await
        {
            warn!(error = %error, action = %action, "goal saved but points not awarded");
        }
    }

    async fn award_once_quietly(&self, user_id: &UserId, action: RewardAction, reference: Uuid) {
        if let Err(error) = self
            .rewards
            .award_once(user_id, action, &reference.to_string())
            .await
        {
            warn!(error = %error, action = %action, "goal saved but points not awarded");
        }
    }
}

#[cfg(test)]
#[path = "goal_service_tests.rs"]
mod tests;
