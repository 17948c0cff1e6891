use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::BotResult,
    service::{ai::AiProvider, ServiceRegistry},
    storage::AccountStore,
    utils::Clock,
};

/// Everything a handler needs, injected through `dptree::deps!`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: ServiceRegistry,
}

impl AppState {
    pub async fn new(config: AppConfig, clock: Arc<dyn Clock>) -> BotResult<Self> {
        let services = ServiceRegistry::new(&config, clock).await?;

        Ok(Self {
            config: Arc::new(config),
            services,
        })
    }

    pub fn with_parts(
        config: AppConfig,
        store: Arc<dyn AccountStore>,
        clock: Arc<dyn Clock>,
        ai: Arc<dyn AiProvider>,
    ) -> Self {
        let services = ServiceRegistry::with_parts(&config, store, clock, ai);

        Self {
            config: Arc::new(config),
            services,
        }
    }
}
