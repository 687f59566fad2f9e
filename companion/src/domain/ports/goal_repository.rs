//! Port for user goals and milestones.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Goal, GoalStatus, Milestone, NewGoal, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by goal persistence adapters.
    pub enum GoalRepositoryError {
        /// Backend could not be reached.
        Connection { message: String } => "goal repository connection failed: {message}",
        /// Backend rejected or failed the query.
        Query { message: String } => "goal repository query failed: {message}",
        /// Stored rows did not decode.
        Decode { message: String } => "goal repository decode failed: {message}",
        /// Row-level security refused the caller.
        Unauthorized { message: String } => "goal repository unauthorised: {message}",
    }
}

/// Port for goal persistence.
///
/// Goals are always returned with their milestones ordered by position.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn create(&self, goal: &NewGoal) -> Result<Goal, GoalRepositoryError>;

    /// Goals owned by a user, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Goal>, GoalRepositoryError>;

    async fn find(
        &self,
        user_id: &UserId,
        goal_id: Uuid,
    ) -> Result<Option<Goal>, GoalRepositoryError>;

    async fn add_milestone(
        &self,
        goal_id: Uuid,
        title: &str,
        position: u32,
    ) -> Result<Milestone, GoalRepositoryError>;

    async fn set_milestone_completed(
        &self,
        milestone_id: Uuid,
        completed: bool,
    ) -> Result<(), GoalRepositoryError>;

    async fn update_status(
        &self,
        goal_id: Uuid,
        status: GoalStatus,
    ) -> Result<(), GoalRepositoryError>;

    /// Delete a goal owned by `user_id`. Returns whether a row was removed.
    async fn delete(&self, user_id: &UserId, goal_id: Uuid) -> Result<bool, GoalRepositoryError>;
}

/// Fixture implementation with no stored goals.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGoalRepository;

#[async_trait]
impl GoalRepository for FixtureGoalRepository {
    async fn create(&self, goal: &NewGoal) -> Result<Goal, GoalRepositoryError> {
        Ok(Goal {
            id: Uuid::new_v4(),
            user_id: goal.user_id.clone(),
            title: goal.title.clone(),
            description: goal.description.clone(),
            category: goal.category.clone(),
            target_date: goal.target_date,
            status: GoalStatus::Active,
            milestones: Vec::new(),
            created_at: chrono::Utc::now(),
        })
    }

    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Goal>, GoalRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(
        &self,
        _user_id: &UserId,
        _goal_id: Uuid,
    ) -> Result<Option<Goal>, GoalRepositoryError> {
        Ok(None)
    }

    async fn add_milestone(
        &self,
        goal_id: Uuid,
        title: &str,
        position: u32,
    ) -> Result<Milestone, GoalRepositoryError> {
        Ok(Milestone {
            id: Uuid::new_v4(),
            goal_id,
            title: title.to_owned(),
            completed: false,
            position,
        })
    }

    async fn set_milestone_completed(
        &self,
        _milestone_id: Uuid,
        _completed: bool,
    ) -> Result<(), GoalRepositoryError> {
        Ok(())
    }

    async fn update_status(
        &self,
        _goal_id: Uuid,
        _status: GoalStatus,
    ) -> Result<(), GoalRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _user_id: &UserId, _goal_id: Uuid) -> Result<bool, GoalRepositoryError> {
        Ok(false)
    }
}
