use std::sync::Arc;

use ai::{AiProvider, OpenAiClient};
use ledger::LedgerService;
use payment::PaymentService;
use spam::SpamGate;
use usage::UsageGuard;

use crate::{config::AppConfig, storage, utils::Clock};

pub mod ai;
pub mod dialogue;
mod error;
pub mod http;
pub mod ledger;
pub mod payment;
pub mod spam;
pub mod usage;
pub mod user;

pub use error::ServiceError;

#[derive(Clone)]
pub struct ServiceRegistry {
    pub ledger: LedgerService,
    pub spam_gate: SpamGate,
    pub usage: UsageGuard,
    pub ai: Arc<dyn AiProvider>,
    pub payment: PaymentService,
}

impl ServiceRegistry {
    pub async fn new(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self, ServiceError> {
        info!("Initializing service registry");

        let store = storage::open_account_store(&config.storage).await?;
        let ai: Arc<dyn AiProvider> = Arc::new(OpenAiClient::new(http::create_openai_client()?, config.ai.clone()));

        let registry = Self::with_parts(config, store, clock, ai);

        info!("Service registry initialized");
        Ok(registry)
    }

    pub fn with_parts(
        config: &AppConfig,
        store: Arc<dyn storage::AccountStore>,
        clock: Arc<dyn Clock>,
        ai: Arc<dyn AiProvider>,
    ) -> Self {
        let ledger = LedgerService::new(store, Arc::clone(&clock));
        let spam_gate = SpamGate::new(clock);
        let usage = UsageGuard::new(
            ledger.clone(),
            spam_gate.clone(),
            config.quota.daily_free_limit,
            config.quota.spam_interval(),
        );

        Self {
            ledger,
            spam_gate,
            usage,
            ai,
            payment: PaymentService::new(config.payment.clone()),
        }
    }
}
