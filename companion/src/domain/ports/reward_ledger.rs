//! Port for the append-only points ledger.
//!
//! There is deliberately no update or delete operation: a user's total is
//! always the sum of what has been appended.

use async_trait::async_trait;

use crate::domain::{RewardEntry, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger adapters.
    pub enum RewardLedgerError {
        /// Backend could not be reached.
        Connection { message: String } => "reward ledger connection failed: {message}",
        /// Backend rejected or failed the query.
        Query { message: String } => "reward ledger query failed: {message}",
        /// Stored rows did not decode.
        Decode { message: String } => "reward ledger decode failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardLedger: Send + Sync {
    /// Append one entry.
    async fn append(&self, entry: &RewardEntry) -> Result<(), RewardLedgerError>;

    /// Every entry for a user, oldest first.
    async fn entries_for(&self, user_id: &UserId) -> Result<Vec<RewardEntry>, RewardLedgerError>;
}

/// Fixture ledger that discards appends and reports no history.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRewardLedger;

#[async_trait]
impl RewardLedger for FixtureRewardLedger {
    async fn append(&self, _entry: &RewardEntry) -> Result<(), RewardLedgerError> {
        Ok(())
    }

    async fn entries_for(&self, _user_id: &UserId) -> Result<Vec<RewardEntry>, RewardLedgerError> {
        Ok(Vec::new())
    }
}
