use std::time::Duration;

use crate::{
    service::{
        dialogue::model::MenuAction,
        ledger::{is_within_free_limit, LedgerError, LedgerService},
        spam::SpamGate,
        user::{AccountId, UserAccount},
    },
    utils::seconds_to_human_readable,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Too soon after the previous accepted action.
    Throttled,
    /// Free quota used up for today.
    LimitReached(UserAccount),
    Admitted(UserAccount),
}

/// Runs the spam gate, then the quota check, before a user action is served.
#[derive(Clone)]
pub struct UsageGuard {
    ledger: LedgerService,
    spam_gate: SpamGate,
    daily_limit: u32,
    spam_interval: Duration,
}

impl UsageGuard {
    pub fn new(ledger: LedgerService, spam_gate: SpamGate, daily_limit: u32, spam_interval: Duration) -> Self {
        Self {
            ledger,
            spam_gate,
            daily_limit,
            spam_interval,
        }
    }

    pub async fn admit(&self, user_id: AccountId, action: &MenuAction) -> Result<Admission, LedgerError> {
        if !self.spam_gate.allow(user_id, self.spam_interval) {
            if let Some(left) = self.spam_gate.remaining(user_id, self.spam_interval) {
                debug!(
                    "user {} throttled, next action in {}",
                    user_id,
                    seconds_to_human_readable(left.as_secs().max(1))
                );
            }
            return Ok(Admission::Throttled);
        }

        let account = self.ledger.get_or_create(user_id).await?;

        if action.is_quota_gated() && !is_within_free_limit(&account, self.daily_limit) {
            info!("user {} reached the daily limit of {}", user_id, self.daily_limit);
            return Ok(Admission::LimitReached(account));
        }

        Ok(Admission::Admitted(account))
    }

    /// Counts one metered request. Called before the paid AI call is made.
    pub async fn charge(&self, user_id: AccountId) -> Result<UserAccount, LedgerError> {
        self.ledger.increment(user_id).await
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }
}
