//! Shared test doubles for service tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{AuthSession, FixtureAuthSession, RewardLedger, RewardLedgerError};
use crate::domain::{RewardEntry, SessionUser, UserId};

pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub fn signed_in(user_id: &UserId) -> Arc<dyn AuthSession> {
    Arc::new(FixtureAuthSession::signed_in(SessionUser {
        id: user_id.clone(),
        email: Some("reader@example.test".to_owned()),
    }))
}

pub fn anonymous() -> Arc<dyn AuthSession> {
    Arc::new(FixtureAuthSession::anonymous())
}

/// In-memory ledger that records appends so tests can assert on them.
#[derive(Default)]
pub struct RecordingLedger(Mutex<Vec<RewardEntry>>);

impl RecordingLedger {
    pub fn entries(&self) -> Vec<RewardEntry> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RewardEntry>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("ledger mutex"),
        }
    }
}

#[async_trait::async_trait]
impl RewardLedger for RecordingLedger {
    async fn append(&self, entry: &RewardEntry) -> Result<(), RewardLedgerError> {
        self.lock().push(entry.clone());
        Ok(())
    }

    async fn entries_for(&self, user_id: &UserId) -> Result<Vec<RewardEntry>, RewardLedgerError> {
        Ok(self
            .lock()
            .iter()
            .filter(|entry| &entry.user_id == user_id)
            .cloned()
            .collect())
    }
}
