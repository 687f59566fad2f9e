//! REST-backed `GoalRepository` over `user_goals` and `goal_milestones`.
//!
//! Goals are read with their milestones embedded through PostgREST's
//! resource embedding, so one request yields the whole aggregate.

use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde_json::json;
use uuid::Uuid;

use super::client::{RestClient, RestError};
use super::dto::{GoalRow, MilestoneRow, NewGoalRow, NewMilestoneRow};
use super::error_mapping::map_basic_rest_error;
use super::query::{Direction, TableQuery};
use crate::domain::ports::{GoalRepository, GoalRepositoryError};
use crate::domain::{Goal, GoalStatus, Milestone, NewGoal, UserId};

const USER_GOALS: &str = "user_goals";
const GOAL_MILESTONES: &str = "goal_milestones";
const GOAL_WITH_MILESTONES: &str = "*,goal_milestones(*)";

#[derive(Clone)]
pub struct RestGoalRepository {
    client: RestClient,
}

impl RestGoalRepository {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

fn map_rest_error(error: RestError) -> GoalRepositoryError {
    if let RestError::Unauthorized { message } = error {
        return GoalRepositoryError::unauthorized(message);
    }
    map_basic_rest_error(
        error,
        GoalRepositoryError::connection,
        GoalRepositoryError::query,
        GoalRepositoryError::decode,
    )
}

fn into_goals(rows: Vec<GoalRow>) -> Result<Vec<Goal>, GoalRepositoryError> {
    rows.into_iter()
        .map(GoalRow::into_domain)
        .collect::<Result<_, _>>()
        .map_err(GoalRepositoryError::decode)
}

fn require_affected(rows: &[IgnoredAny], what: &str) -> Result<(), GoalRepositoryError> {
    if rows.is_empty() {
        Err(GoalRepositoryError::query(format!("{what} matched no rows")))
    } else {
        Ok(())
    }
}

#[async_trait]
impl GoalRepository for RestGoalRepository {
    async fn create(&self, goal: &NewGoal) -> Result<Goal, GoalRepositoryError> {
        let rows: Vec<GoalRow> = self
            .client
            .insert(USER_GOALS, &[NewGoalRow::from(goal)])
            .await
            .map_err(map_rest_error)?;
        into_goals(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| GoalRepositoryError::decode("insert returned no rows"))
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Goal>, GoalRepositoryError> {
        let query = TableQuery::table(USER_GOALS)
            .select(GOAL_WITH_MILESTONES)
            .eq("user_id", user_id)
            .order("created_at", Direction::Desc);
        let rows: Vec<GoalRow> = self.client.select(&query).await.map_err(map_rest_error)?;
        into_goals(rows)
    }

    async fn find(
        &self,
        user_id: &UserId,
        goal_id: Uuid,
    ) -> Result<Option<Goal>, GoalRepositoryError> {
        let query = TableQuery::table(USER_GOALS)
            .select(GOAL_WITH_MILESTONES)
            .eq("id", goal_id)
            .eq("user_id", user_id);
        let rows: Vec<GoalRow> = self.client.select(&query).await.map_err(map_rest_error)?;
        Ok(into_goals(rows)?.into_iter().next())
    }

    async fn add_milestone(
        &self,
        goal_id: Uuid,
        title: &str,
        position: u32,
    ) -> Result<Milestone, GoalRepositoryError> {
        let row = NewMilestoneRow {
            goal_id,
            title,
            completed: false,
            position,
        };
        let rows: Vec<MilestoneRow> = self
            .client
            .insert(GOAL_MILESTONES, &[row])
            .await
            .map_err(map_rest_error)?;
        rows.into_iter()
            .next()
            .map(Milestone::from)
            .ok_or_else(|| GoalRepositoryError::decode("insert returned no rows"))
    }

    async fn set_milestone_completed(
        &self,
        milestone_id: Uuid,
        completed: bool,
    ) -> Result<(), GoalRepositoryError> {
        let query = TableQuery::table(GOAL_MILESTONES).eq("id", milestone_id);
        let rows: Vec<IgnoredAny> = self
            .client
            .update(&query, &json!({ "completed": completed }))
            .await
            .map_err(map_rest_error)?;
        require_affected(&rows, "milestone update")
    }

    async fn update_status(
        &self,
        goal_id: Uuid,
        status: GoalStatus,
    ) -> Result<(), GoalRepositoryError> {
        let query = TableQuery::table(USER_GOALS).eq("id", goal_id);
        let rows: Vec<IgnoredAny> = self
            .client
            .update(&query, &json!({ "status": status.as_str() }))
            .await
            .map_err(map_rest_error)?;
        require_affected(&rows, "goal status update")
    }

    async fn delete(&self, user_id: &UserId, goal_id: Uuid) -> Result<bool, GoalRepositoryError> {
        let query = TableQuery::table(USER_GOALS)
            .eq("id", goal_id)
            .eq("user_id", user_id);
        let removed: Vec<IgnoredAny> = self.client.delete(&query).await.map_err(map_rest_error)?;
        Ok(!removed.is_empty())
    }
}
