use shuttle_runtime::SecretStore;
use std::{path::PathBuf, str::FromStr, time::Duration};
use teloxide::types::Currency;

use crate::service::payment::parse_currency;

/// Initial DashMap capacity for the in-memory account store.
const MEMORY_STORE_CAPACITY: usize = 10_000;

/// Spam gate entries are kept this many gate intervals unless configured.
const DEFAULT_RETENTION_FACTOR: u64 = 20;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing secret: {0}")]
    Missing(String),
    #[error("Invalid value for secret: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub storage: StorageConfig,
    pub quota: QuotaConfig,
    pub ai: AiConfig,
    pub payment: PaymentConfig,
    pub dialogue: DialogueConfig,
    pub locale: String,
}

#[derive(Clone, Debug)]
pub struct TelegramConfig(pub String);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Turso { url: String, token: String },
    Local { path: PathBuf },
    Memory,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub memory_capacity: usize,
}

#[derive(Clone, Debug)]
pub struct QuotaConfig {
    pub daily_free_limit: u32,
    pub spam_interval_secs: u64,
    /// Spam gate entries idle for longer than this are evicted.
    pub spam_retention_secs: u64,
    pub spam_evict_interval_secs: u64,
}

impl QuotaConfig {
    pub fn spam_interval(&self) -> Duration {
        Duration::from_secs(self.spam_interval_secs)
    }

    /// Age after which the eviction sweep may forget a user. Never shorter than the gate interval.
    pub fn spam_retention(&self) -> Duration {
        Duration::from_secs(self.spam_retention_secs.max(self.spam_interval_secs))
    }
}

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub image_model: String,
    pub image_size: String,
}

#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub provider_token: String,
    /// ISO 4217 code sent with the invoice.
    pub currency_code: String,
    pub currency: Currency,
    /// Price in the currency's smallest unit (tiyin for UZS).
    pub price_minor: u32,
}

#[derive(Clone, Debug)]
pub struct DialogueConfig {
    pub redis_url: Option<String>,
}

pub fn build_config(secret_store: &SecretStore) -> Result<AppConfig, ConfigError> {
    build_config_from(|key| secret_store.get(key))
}

pub fn build_config_from(lookup: impl Fn(&str) -> Option<String>) -> Result<AppConfig, ConfigError> {
    info!("Building AppConfig...");

    let secrets = Secrets { lookup };

    let backend = match secrets.or("STORAGE_BACKEND", "turso").to_lowercase().as_str() {
        "turso" => StorageBackend::Turso {
            url: secrets.required("TURSO_URL")?,
            token: secrets.required("TURSO_TOKEN")?,
        },
        "local" => StorageBackend::Local {
            path: PathBuf::from(secrets.or("LOCAL_DB_PATH", "bot.db")),
        },
        "memory" => StorageBackend::Memory,
        _ => return Err(ConfigError::Invalid("STORAGE_BACKEND".to_string())),
    };

    let currency_code = secrets.or("PRO_CURRENCY", "UZS").to_uppercase();
    let currency = parse_currency(&currency_code).ok_or_else(|| ConfigError::Invalid("PRO_CURRENCY".to_string()))?;

    let spam_interval_secs: u64 = secrets.parsed_or("SPAM_INTERVAL_SECS", 3)?;
    let spam_retention_secs: u64 =
        secrets.parsed_or("SPAM_RETENTION_SECS", spam_interval_secs.saturating_mul(DEFAULT_RETENTION_FACTOR))?;
    // Evicting a user inside the open window would let the next action through early.
    if spam_retention_secs < spam_interval_secs {
        return Err(ConfigError::Invalid("SPAM_RETENTION_SECS".to_string()));
    }

    let redis_url = if secrets.parsed_or("DIALOGUE_USE_REDIS", false)? {
        Some(secrets.required("REDIS_URL")?)
    } else {
        None
    };

    let config = AppConfig {
        telegram: TelegramConfig(secrets.required("TELEGRAM_BOT_TOKEN")?),
        storage: StorageConfig {
            backend,
            memory_capacity: MEMORY_STORE_CAPACITY,
        },
        quota: QuotaConfig {
            daily_free_limit: secrets.parsed_or("DAILY_FREE_LIMIT", 10)?,
            spam_interval_secs,
            spam_retention_secs,
            spam_evict_interval_secs: secrets.parsed_or("SPAM_EVICT_INTERVAL_SECS", 300)?,
        },
        ai: AiConfig {
            api_key: secrets.required("OPENAI_API_KEY")?,
            base_url: secrets.or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            chat_model: secrets.or("OPENAI_CHAT_MODEL", "gpt-4o-mini"),
            image_model: secrets.or("OPENAI_IMAGE_MODEL", "gpt-image-1"),
            image_size: secrets.or("OPENAI_IMAGE_SIZE", "1024x1024"),
        },
        payment: PaymentConfig {
            provider_token: secrets.required("TG_MERCHANT_TOKEN")?,
            currency_code,
            currency,
            price_minor: secrets.parsed_or("PRO_PRICE_MINOR", 1_000_000)?,
        },
        dialogue: DialogueConfig { redis_url },
        locale: secrets.or("BOT_LOCALE", "uz"),
    };

    if config.quota.spam_evict_interval_secs == 0 {
        return Err(ConfigError::Invalid("SPAM_EVICT_INTERVAL_SECS".to_string()));
    }

    info!("AppConfig built");

    Ok(config)
}

struct Secrets<F> {
    lookup: F,
}

impl<F> Secrets<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(value) => value.parse::<T>().map_err(|_| ConfigError::Invalid(key.to_string())),
            None => Ok(default),
        }
    }
}
