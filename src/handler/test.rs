use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use url::Url;

use crate::{
    config::{build_config_from, AppConfig},
    service::{
        ai::{AiError, AiProvider, GeneratedImage},
        user::AccountId,
    },
    state::AppState,
    storage::MemoryStore,
    utils::ManualClock,
};

pub const CAT_URL: &str = "https://img.example.com/cat.png";

/// Echoes chat prompts and returns a fixed image, or fails every call.
pub struct FakeAi {
    calls: AtomicUsize,
    fail: bool,
}

impl FakeAi {
    pub fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiProvider for FakeAi {
    async fn chat(&self, prompt: &str) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AiError::EmptyResponse);
        }
        Ok(format!("echo: {}", prompt))
    }

    async fn image(&self, _prompt: &str) -> Result<GeneratedImage, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AiError::Api {
                status: 400,
                message: "content policy".to_string(),
            });
        }
        Ok(GeneratedImage::Url(Url::parse(CAT_URL).unwrap()))
    }
}

pub fn test_config() -> AppConfig {
    let map: HashMap<&str, &str> = HashMap::from([
        ("TELEGRAM_BOT_TOKEN", "123:abc"),
        ("OPENAI_API_KEY", "sk-test"),
        ("TG_MERCHANT_TOKEN", "merchant"),
        ("STORAGE_BACKEND", "memory"),
    ]);
    build_config_from(|key| map.get(key).map(|v| v.to_string())).unwrap()
}

pub fn setup_test_state(ai: Arc<FakeAi>) -> (AppState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at("2024-05-01T09:00:00+05:00"));
    let state = AppState::with_parts(test_config(), Arc::new(MemoryStore::new(16)), clock.clone(), ai);
    (state, clock)
}

pub fn user(id: i64) -> AccountId {
    AccountId::new(id).unwrap()
}
