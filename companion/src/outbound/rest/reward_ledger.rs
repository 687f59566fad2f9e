//! REST-backed `RewardLedger` over the append-only `user_rewards` table.

use async_trait::async_trait;
use serde::de::IgnoredAny;

use super::client::{RestClient, RestError};
use super::dto::RewardRow;
use super::error_mapping::map_basic_rest_error;
use super::query::{Direction, TableQuery};
use crate::domain::ports::{RewardLedger, RewardLedgerError};
use crate::domain::{RewardEntry, UserId};

const USER_REWARDS: &str = "user_rewards";

#[derive(Clone)]
pub struct RestRewardLedger {
    client: RestClient,
}

impl RestRewardLedger {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

fn map_rest_error(error: RestError) -> RewardLedgerError {
    map_basic_rest_error(
        error,
        RewardLedgerError::connection,
        RewardLedgerError::query,
        RewardLedgerError::decode,
    )
}

#[async_trait]
impl RewardLedger for RestRewardLedger {
    async fn append(&self, entry: &RewardEntry) -> Result<(), RewardLedgerError> {
        let _stored: Vec<IgnoredAny> = self
            .client
            .insert(USER_REWARDS, &[RewardRow::from(entry)])
            .await
            .map_err(map_rest_error)?;
        Ok(())
    }

    async fn entries_for(&self, user_id: &UserId) -> Result<Vec<RewardEntry>, RewardLedgerError> {
        let query = TableQuery::table(USER_REWARDS)
            .select("*")
            .eq("user_id", user_id)
            .order("created_at", Direction::Asc);
        let rows: Vec<RewardRow> = self.client.select(&query).await.map_err(map_rest_error)?;
        rows.into_iter()
            .map(RewardRow::into_domain)
            .collect::<Result<_, _>>()
            .map_err(RewardLedgerError::decode)
    }
}
