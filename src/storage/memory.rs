use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use std::sync::Arc;

use super::{AccountStore, StorageError};
use crate::service::user::{AccountId, UserAccount};

#[derive(Clone, Debug)]
pub struct MemoryStore {
    accounts: Arc<DashMap<AccountId, UserAccount>>,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            accounts: Arc::new(DashMap::with_capacity(capacity)),
        }
    }

    // The entry guard holds the shard lock, so insert, roll over and mutate
    // happen as one step per account.
    fn update<F>(&self, user_id: AccountId, today: NaiveDate, mutate: F) -> UserAccount
    where
        F: FnOnce(&mut UserAccount),
    {
        let mut entry = self
            .accounts
            .entry(user_id)
            .or_insert_with(|| UserAccount::new(user_id, today));

        let account = entry.value_mut();
        account.roll_over(today);
        mutate(account);
        account.clone()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn load_or_insert(&self, user_id: AccountId, today: NaiveDate) -> Result<UserAccount, StorageError> {
        Ok(self.update(user_id, today, |_| {}))
    }

    async fn increment(&self, user_id: AccountId, today: NaiveDate) -> Result<UserAccount, StorageError> {
        let mut overflowed = false;
        let account = self.update(user_id, today, |account| match account.requests_today.checked_add(1) {
            Some(count) => account.requests_today = count,
            None => overflowed = true,
        });

        if overflowed {
            return Err(StorageError::Memory(format!("request counter overflow for {}", user_id)));
        }

        Ok(account)
    }

    async fn mark_pro(&self, user_id: AccountId, today: NaiveDate) -> Result<UserAccount, StorageError> {
        Ok(self.update(user_id, today, |account| account.is_pro = true))
    }
}
