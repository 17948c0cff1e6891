use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use teloxide::types::{User, UserId};

use crate::service::ledger::LedgerError;

/// Primary key of the quota ledger, a validated Telegram user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(i64);

impl AccountId {
    pub fn new(id: i64) -> Result<Self, LedgerError> {
        if id <= 0 {
            return Err(LedgerError::InvalidUserId(id.to_string()));
        }
        Ok(Self(id))
    }

    /// Reads the id of the update's sender, if there is one.
    pub fn from_sender(sender: Option<&User>) -> Result<Self, LedgerError> {
        let user = sender.ok_or_else(|| LedgerError::InvalidUserId("update has no sender".to_string()))?;
        Self::try_from(user.id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<UserId> for AccountId {
    type Error = LedgerError;

    fn try_from(user_id: UserId) -> Result<Self, Self::Error> {
        let id = i64::try_from(user_id.0).map_err(|_| LedgerError::InvalidUserId(user_id.0.to_string()))?;
        Self::new(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: AccountId,
    pub is_pro: bool,
    pub requests_today: u32,
    pub last_reset_date: NaiveDate,
}

impl UserAccount {
    pub fn new(user_id: AccountId, today: NaiveDate) -> Self {
        Self {
            user_id,
            is_pro: false,
            requests_today: 0,
            last_reset_date: today,
        }
    }

    /// Moves the counter onto `today`. Returns true if it had to be reset.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.last_reset_date == today {
            return false;
        }
        self.requests_today = 0;
        self.last_reset_date = today;
        true
    }
}
