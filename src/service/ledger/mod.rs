//! Quota ledger: per-user subscription flag and daily request counter.
//!
//! The ledger reads "today" from the injected [`Clock`] once per call and
//! hands it to the [`AccountStore`], which applies the day rollover and the
//! mutation atomically. Concurrent calls for one user therefore serialize in
//! the store, while different users never share a lock.

mod error;

pub use error::LedgerError;

use std::sync::Arc;

use crate::{
    service::user::{AccountId, UserAccount},
    storage::AccountStore,
    utils::Clock,
};

#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn AccountStore>, clock: Arc<dyn Clock>) -> Self {
        info!("Initializing ledger service");
        Self { store, clock }
    }

    pub async fn get_or_create(&self, user_id: AccountId) -> Result<UserAccount, LedgerError> {
        let account = self.store.load_or_insert(user_id, self.clock.today()).await?;
        Ok(account)
    }

    pub async fn increment(&self, user_id: AccountId) -> Result<UserAccount, LedgerError> {
        let account = self.store.increment(user_id, self.clock.today()).await?;
        debug!("user {} used {} requests today", user_id, account.requests_today);
        Ok(account)
    }

    pub async fn mark_pro(&self, user_id: AccountId) -> Result<UserAccount, LedgerError> {
        let account = self.store.mark_pro(user_id, self.clock.today()).await?;
        info!("user {} is now pro", user_id);
        Ok(account)
    }
}

pub fn is_within_free_limit(account: &UserAccount, limit: u32) -> bool {
    account.is_pro || account.requests_today < limit
}
