use teloxide::{
    adaptors::Throttle,
    dispatching::{UpdateFilterExt, UpdateHandler},
    payloads::AnswerPreCheckoutQuerySetters,
    prelude::Requester,
    types::{ChatId, Currency, Message, PreCheckoutQuery, SuccessfulPayment, Update},
    Bot,
};

use crate::{
    error::HandlerResult,
    service::{
        ledger::LedgerError,
        payment::PaymentError,
        user::{AccountId, UserAccount},
    },
    state::AppState,
};

/// Result of a successful-payment notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum PaymentOutcome {
    Activated(UserAccount),
    Ignored(PaymentError),
}

pub fn get_pre_checkout_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    Update::filter_pre_checkout_query().endpoint(handle_pre_checkout)
}

pub fn get_successful_payment_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    Update::filter_message()
        .filter_map(|msg: Message| msg.successful_payment().cloned())
        .endpoint(handle_successful_payment)
}

pub(super) async fn send_pro_invoice(bot: &Throttle<Bot>, chat_id: ChatId, state: &AppState) -> HandlerResult<()> {
    let payment = &state.services.payment;
    let invoice = payment.invoice();

    bot.send_invoice(
        chat_id,
        invoice.title,
        invoice.description,
        invoice.payload,
        payment.provider_token(),
        invoice.currency,
        invoice.prices,
    )
    .await?;

    Ok(())
}

async fn handle_pre_checkout(bot: Throttle<Bot>, query: PreCheckoutQuery, state: AppState) -> HandlerResult<()> {
    match review_checkout(&state, &query.invoice_payload, &query.currency, query.total_amount) {
        Ok(()) => {
            debug!("Accepting pre-checkout from user {}", query.from.id);
            bot.answer_pre_checkout_query(query.id, true).await?;
        }
        Err(e) => {
            warn!("Rejecting pre-checkout from user {}: {}", query.from.id, e);
            bot.answer_pre_checkout_query(query.id, false)
                .error_message(t!("payment.rejected"))
                .await?;
        }
    }

    Ok(())
}

async fn handle_successful_payment(
    bot: Throttle<Bot>,
    msg: Message,
    payment: SuccessfulPayment,
    state: AppState,
) -> HandlerResult<()> {
    let user_id = match AccountId::from_sender(msg.from.as_ref()) {
        Ok(user_id) => user_id,
        Err(e) => {
            error!("Payment for {:?} without a valid payer: {}", payment.invoice_payload, e);
            return Ok(());
        }
    };

    let outcome = settle_payment(
        &state,
        user_id,
        &payment.invoice_payload,
        &payment.currency,
        payment.total_amount,
    )
    .await?;

    match outcome {
        PaymentOutcome::Activated(account) => {
            info!(
                "User {} upgraded to PRO, requests today: {}",
                user_id, account.requests_today
            );
            bot.send_message(msg.chat.id, t!("payment.activated")).await?;
        }
        PaymentOutcome::Ignored(e) => warn!("Ignoring payment from user {}: {}", user_id, e),
    }

    Ok(())
}

/// Answer for a pre-checkout query.
pub(super) fn review_checkout(
    state: &AppState,
    payload: &str,
    currency: &Currency,
    total_amount: u32,
) -> Result<(), PaymentError> {
    state.services.payment.validate_checkout(payload, currency, total_amount)
}

/// Applies a completed payment. Repeated notifications for the same payer leave a single PRO flag.
pub(super) async fn settle_payment(
    state: &AppState,
    user_id: AccountId,
    payload: &str,
    currency: &Currency,
    total_amount: u32,
) -> Result<PaymentOutcome, LedgerError> {
    if let Err(e) = review_checkout(state, payload, currency, total_amount) {
        return Ok(PaymentOutcome::Ignored(e));
    }

    let account = state.services.ledger.mark_pro(user_id).await?;
    Ok(PaymentOutcome::Activated(account))
}
