use teloxide::types::{Currency, LabeledPrice};

use crate::config::PaymentConfig;

pub const PRO_PAYLOAD: &str = "PRO_SUB";

/// Maps an ISO 4217 code such as `UZS` onto Telegram's currency type.
pub fn parse_currency(code: &str) -> Option<Currency> {
    serde_json::from_value(serde_json::Value::String(code.trim().to_uppercase())).ok()
}

#[derive(Debug, Clone)]
pub struct Invoice {
    pub title: String,
    pub description: String,
    pub payload: String,
    pub currency: String,
    pub prices: Vec<LabeledPrice>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Unknown invoice payload: {0}")]
    UnknownPayload(String),
    #[error("Currency mismatch: expected {expected:?}, got {actual:?}")]
    CurrencyMismatch { expected: Currency, actual: Currency },
    #[error("Amount mismatch: expected {expected}, got {actual}")]
    AmountMismatch { expected: u32, actual: u32 },
}

/// One-time PRO upgrade through Telegram Payments.
#[derive(Clone)]
pub struct PaymentService {
    config: PaymentConfig,
}

impl PaymentService {
    pub fn new(config: PaymentConfig) -> Self {
        info!(
            "Initializing payment service ({} {})",
            config.price_minor, config.currency_code
        );
        Self { config }
    }

    pub fn provider_token(&self) -> &str {
        &self.config.provider_token
    }

    pub fn invoice(&self) -> Invoice {
        Invoice {
            title: t!("payment.invoice.title").to_string(),
            description: t!("payment.invoice.description").to_string(),
            payload: PRO_PAYLOAD.to_string(),
            currency: self.config.currency_code.clone(),
            prices: vec![LabeledPrice::new(
                t!("payment.invoice.price_label").to_string(),
                self.config.price_minor,
            )],
        }
    }

    /// Checks a pre-checkout query or a completed payment against our PRO invoice.
    pub fn validate_checkout(&self, payload: &str, currency: &Currency, total_amount: u32) -> Result<(), PaymentError> {
        if payload != PRO_PAYLOAD {
            return Err(PaymentError::UnknownPayload(payload.to_string()));
        }

        if *currency != self.config.currency {
            return Err(PaymentError::CurrencyMismatch {
                expected: self.config.currency.clone(),
                actual: currency.clone(),
            });
        }

        if total_amount != self.config.price_minor {
            return Err(PaymentError::AmountMismatch {
                expected: self.config.price_minor,
                actual: total_amount,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn currency(code: &str) -> Currency {
        parse_currency(code).unwrap()
    }

    fn service() -> PaymentService {
        PaymentService::new(PaymentConfig {
            provider_token: "merchant-token".to_string(),
            currency_code: "UZS".to_string(),
            currency: currency("UZS"),
            price_minor: 1_000_000,
        })
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("uzs"), parse_currency("UZS"));
        assert!(parse_currency("UZS").is_some());
        assert!(parse_currency("USD").is_some());
        assert_ne!(parse_currency("USD"), parse_currency("UZS"));
        assert!(parse_currency("SUM").is_none());
        assert!(parse_currency("").is_none());
    }

    #[test]
    fn test_invoice_shape() {
        let invoice = service().invoice();

        assert_eq!(invoice.payload, PRO_PAYLOAD);
        assert_eq!(invoice.currency, "UZS");
        assert_eq!(invoice.prices.len(), 1);
        assert_eq!(invoice.prices[0].amount, 1_000_000);
    }

    #[test]
    fn test_validate_checkout() {
        let service = service();

        assert_eq!(service.validate_checkout("PRO_SUB", &currency("UZS"), 1_000_000), Ok(()));
        assert_eq!(
            service.validate_checkout("OTHER", &currency("UZS"), 1_000_000),
            Err(PaymentError::UnknownPayload("OTHER".to_string()))
        );
        assert_eq!(
            service.validate_checkout("PRO_SUB", &currency("USD"), 1_000_000),
            Err(PaymentError::CurrencyMismatch {
                expected: currency("UZS"),
                actual: currency("USD")
            })
        );
        assert_eq!(
            service.validate_checkout("PRO_SUB", &currency("UZS"), 100),
            Err(PaymentError::AmountMismatch {
                expected: 1_000_000,
                actual: 100
            })
        );
    }
}
