use std::sync::Arc;
use std::time::Duration;

use teloxide::adaptors::throttle::Limits;
use teloxide::adaptors::Throttle;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::Bot;
use tokio::task::JoinHandle;

use crate::command::setup_commands;
use crate::config::AppConfig;
use crate::error::{BotResult, HandlerResult};
use crate::handler::get_handler;
use crate::service::dialogue::DialogueService;
use crate::service::{http, ServiceError};
use crate::state::AppState;
use crate::utils::SystemClock;

pub struct BotService {
    pub bot: Throttle<Bot>,
    pub state: AppState,
}

impl BotService {
    pub async fn new(config: AppConfig) -> BotResult<Self> {
        // teloxide ships its own reqwest, so the Telegram client is built from its settings.
        let client = teloxide::net::default_reqwest_settings()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(60))
            .tcp_keepalive(Duration::from_secs(30))
            .user_agent(http::DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| ServiceError::TelegramClient(e.to_string()))?;

        let bot = Bot::with_client(config.telegram.0.clone(), client).throttle(Limits::default());

        info!("Initializing AppState...");
        let state = AppState::new(config, Arc::new(SystemClock)).await?;
        info!("AppState initialized");

        Ok(Self { bot, state })
    }

    pub async fn start(&self) -> HandlerResult<()> {
        info!("Testing connection to Telegram API...");
        match self.bot.get_me().await {
            Ok(me) => info!("Successfully connected to Telegram API as @{}", me.username()),
            Err(e) => {
                error!("Failed to connect to Telegram API: {:?}", e);
                return Err(anyhow::anyhow!("Failed to connect to Telegram API: {}", e).into());
            }
        }

        let bot = self.bot.clone();
        let state = self.state.clone();
        let storage = DialogueService::get_dialogue_storage(&state.config.dialogue).await?;

        setup_commands(&bot).await?;

        let eviction = self.spawn_spam_eviction();

        Dispatcher::builder(bot, get_handler())
            .dependencies(dptree::deps![storage, state])
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        eviction.abort();
        info!("Dispatcher stopped");

        Ok(())
    }

    fn spawn_spam_eviction(&self) -> JoinHandle<()> {
        let spam_gate = self.state.services.spam_gate.clone();
        let quota = &self.state.config.quota;
        let period = Duration::from_secs(quota.spam_evict_interval_secs);
        let max_age = quota.spam_retention();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // the first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let evicted = spam_gate.evict_older_than(max_age);
                if evicted > 0 {
                    debug!(
                        "Evicted {} idle spam gate entries, {} still tracked",
                        evicted,
                        spam_gate.tracked_users()
                    );
                }
            }
        })
    }
}
