use crate::storage::StorageError;

use super::{ai::AiError, ledger::LedgerError, payment::PaymentError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("AI error: {0}")]
    Ai(#[from] AiError),
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Telegram client error: {0}")]
    TelegramClient(String),
}
