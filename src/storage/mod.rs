mod error;
mod memory;
mod turso;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use turso::TursoClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::{
    config::{StorageBackend, StorageConfig},
    service::user::{AccountId, UserAccount},
};

/// Durable home of the per-user quota rows.
///
/// Every method receives the caller's `today` and must roll a row dated any
/// other day back to zero before applying its own mutation, as one atomic
/// step per account.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Returns the account, inserting a fresh free-tier row dated `today` if absent.
    async fn load_or_insert(&self, user_id: AccountId, today: NaiveDate) -> Result<UserAccount, StorageError>;

    /// Adds one request to today's counter and returns the updated row.
    async fn increment(&self, user_id: AccountId, today: NaiveDate) -> Result<UserAccount, StorageError>;

    /// Flags the account as pro. Repeated calls leave it unchanged.
    async fn mark_pro(&self, user_id: AccountId, today: NaiveDate) -> Result<UserAccount, StorageError>;
}

pub async fn open_account_store(config: &StorageConfig) -> Result<Arc<dyn AccountStore>, StorageError> {
    let store: Arc<dyn AccountStore> = match &config.backend {
        StorageBackend::Turso { url, token } => Arc::new(TursoClient::remote(url, token).await?),
        StorageBackend::Local { path } => Arc::new(TursoClient::local(path).await?),
        StorageBackend::Memory => {
            warn!("Using in-memory account store, quotas will not survive a restart");
            Arc::new(MemoryStore::new(config.memory_capacity))
        }
    };

    Ok(store)
}
