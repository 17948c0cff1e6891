mod prompt;

use teloxide::{
    adaptors::Throttle,
    dispatching::{UpdateFilterExt, UpdateHandler},
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{InputFile, Message, Update},
    Bot,
};

use crate::{
    error::{BotError, HandlerResult},
    service::{
        ai::GeneratedImage,
        dialogue::model::{InteractionMode, MenuAction},
        ledger::LedgerError,
        usage::Admission,
        user::{AccountId, UserAccount},
    },
    state::AppState,
    utils::split_text,
};

use super::{keyboard::get_main_menu_keyboard, payment::send_pro_invoice, ModeDialogue};

/// Telegram rejects longer text messages.
const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// What the bot does in reply to one text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Outcome {
    Text(String),
    SwitchMode { mode: InteractionMode, text: String },
    Invoice,
    Image(GeneratedImage),
}

pub fn get_message_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    Update::filter_message()
        .filter_map(|msg: Message| msg.text().map(ToOwned::to_owned))
        .endpoint(handle_text_message)
}

async fn handle_text_message(
    bot: Throttle<Bot>,
    msg: Message,
    text: String,
    dialogue: ModeDialogue,
    state: AppState,
) -> HandlerResult<()> {
    let user_id = match AccountId::from_sender(msg.from.as_ref()) {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!("Dropping message in chat {}: {}", msg.chat.id, e);
            return Ok(());
        }
    };

    let mode = dialogue
        .get_or_default()
        .await
        .map_err(|e| BotError::DialogueStateError(e.to_string()))?;

    let outcome = match resolve(&state, user_id, mode, MenuAction::classify(&text)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Failed to serve user {}: {}", user_id, e);
            Outcome::Text(t!("messages.unavailable").to_string())
        }
    };

    match outcome {
        Outcome::Text(reply) => {
            for chunk in split_text(&reply, TELEGRAM_MESSAGE_LIMIT) {
                bot.send_message(msg.chat.id, chunk).await?;
            }
        }
        Outcome::SwitchMode { mode, text } => {
            dialogue
                .update(mode)
                .await
                .map_err(|e| BotError::DialogueStateError(e.to_string()))?;
            bot.send_message(msg.chat.id, text).await?;
        }
        Outcome::Invoice => send_pro_invoice(&bot, msg.chat.id, &state).await?,
        Outcome::Image(image) => {
            let photo = match image {
                GeneratedImage::Url(url) => InputFile::url(url),
                GeneratedImage::Bytes(bytes) => InputFile::memory(bytes),
            };
            bot.send_photo(msg.chat.id, photo).await?;
        }
    }

    Ok(())
}

/// Admission first, then the menu action. Nothing here talks to Telegram.
pub(super) async fn resolve(
    state: &AppState,
    user_id: AccountId,
    mode: InteractionMode,
    action: MenuAction,
) -> Result<Outcome, LedgerError> {
    let account = match state.services.usage.admit(user_id, &action).await? {
        Admission::Throttled => return Ok(Outcome::Text(t!("messages.slow_down").to_string())),
        Admission::LimitReached(_) => return Ok(Outcome::Text(t!("messages.limit_reached").to_string())),
        Admission::Admitted(account) => account,
    };

    let outcome = match action {
        MenuAction::Ask => Outcome::SwitchMode {
            mode: InteractionMode::Chat,
            text: t!("messages.ask_prompt").to_string(),
        },
        MenuAction::Draw => Outcome::SwitchMode {
            mode: InteractionMode::Image,
            text: t!("messages.draw_prompt").to_string(),
        },
        MenuAction::English => Outcome::Text(t!("messages.english").to_string()),
        MenuAction::Prava => Outcome::Text(t!("messages.prava").to_string()),
        MenuAction::Pro => Outcome::Invoice,
        MenuAction::Stats => Outcome::Text(stats_text(&account)),
        MenuAction::Prompt(prompt) => prompt::handle_prompt(state, user_id, mode, &prompt).await?,
    };

    Ok(outcome)
}

pub(super) fn stats_text(account: &UserAccount) -> String {
    let is_pro = if account.is_pro {
        t!("messages.stats_yes")
    } else {
        t!("messages.stats_no")
    };

    t!(
        "messages.stats",
        is_pro = is_pro,
        requests_today = account.requests_today
    )
    .to_string()
}

pub async fn handle_message_unknown(bot: Throttle<Bot>, msg: Message) -> HandlerResult<()> {
    bot.send_message(msg.chat.id, t!("messages.choose_from_menu"))
        .reply_markup(get_main_menu_keyboard())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        handler::test::{setup_test_state as setup, user, FakeAi, CAT_URL},
        service::ai::AiError,
    };
    use chrono::Duration;
    use url::Url;

    #[tokio::test]
    async fn test_idle_prompt_is_not_charged() {
        let ai = FakeAi::new(false);
        let (state, _clock) = setup(ai.clone());

        let outcome = resolve(&state, user(1), InteractionMode::Idle, MenuAction::classify("salom"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Text(t!("messages.choose_from_menu").to_string()));
        assert_eq!(ai.calls(), 0);
        assert_eq!(state.services.ledger.get_or_create(user(1)).await.unwrap().requests_today, 0);
    }

    #[tokio::test]
    async fn test_ask_then_chat() {
        let ai = FakeAi::new(false);
        let (state, clock) = setup(ai.clone());

        let outcome = resolve(&state, user(1), InteractionMode::Idle, MenuAction::classify("🤖 Savol"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::SwitchMode {
                mode: InteractionMode::Chat,
                text: t!("messages.ask_prompt").to_string()
            }
        );

        clock.advance(Duration::seconds(5));
        let outcome = resolve(&state, user(1), InteractionMode::Chat, MenuAction::classify("Poytaxt qayer?"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Text("echo: Poytaxt qayer?".to_string()));
        assert_eq!(ai.calls(), 1);
        assert_eq!(state.services.ledger.get_or_create(user(1)).await.unwrap().requests_today, 1);
    }

    #[tokio::test]
    async fn test_throttled_message_skips_ai() {
        let ai = FakeAi::new(false);
        let (state, clock) = setup(ai.clone());

        resolve(&state, user(1), InteractionMode::Chat, MenuAction::Prompt("a".into()))
            .await
            .unwrap();
        clock.advance(Duration::seconds(1));
        let outcome = resolve(&state, user(1), InteractionMode::Chat, MenuAction::Prompt("b".into()))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Text(t!("messages.slow_down").to_string()));
        assert_eq!(ai.calls(), 1);
    }

    #[tokio::test]
    async fn test_limit_reached_after_ten_requests() {
        let ai = FakeAi::new(false);
        let (state, clock) = setup(ai.clone());

        for i in 0..10 {
            let outcome = resolve(&state, user(42), InteractionMode::Chat, MenuAction::Prompt(i.to_string()))
                .await
                .unwrap();
            assert_eq!(outcome, Outcome::Text(format!("echo: {}", i)));
            clock.advance(Duration::seconds(5));
        }

        let outcome = resolve(&state, user(42), InteractionMode::Chat, MenuAction::Prompt("11".into()))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Text(t!("messages.limit_reached").to_string()));
        assert_eq!(ai.calls(), 10);

        clock.advance(Duration::seconds(5));
        let account = state.services.ledger.get_or_create(user(42)).await.unwrap();
        let outcome = resolve(&state, user(42), InteractionMode::Chat, MenuAction::Stats)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Text(stats_text(&account)));
        assert_eq!(account.requests_today, 10);

        clock.advance(Duration::seconds(5));
        let outcome = resolve(&state, user(42), InteractionMode::Chat, MenuAction::Pro)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Invoice);
    }

    #[tokio::test]
    async fn test_ai_failure_is_still_charged() {
        let ai = FakeAi::new(true);
        let (state, _clock) = setup(ai.clone());

        let outcome = resolve(&state, user(3), InteractionMode::Chat, MenuAction::Prompt("hi".into()))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Text(t!("messages.ai_error", error = AiError::EmptyResponse.to_string()).to_string())
        );
        assert_eq!(state.services.ledger.get_or_create(user(3)).await.unwrap().requests_today, 1);
    }

    #[tokio::test]
    async fn test_image_mode() {
        let ai = FakeAi::new(false);
        let (state, clock) = setup(ai.clone());

        let outcome = resolve(&state, user(5), InteractionMode::Image, MenuAction::Prompt("mushuk".into()))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Image(GeneratedImage::Url(Url::parse(CAT_URL).unwrap())));

        let failing = FakeAi::new(true);
        let (state, _clock) = setup(failing);
        let outcome = resolve(&state, user(5), InteractionMode::Image, MenuAction::Prompt("mushuk".into()))
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Text(text) if text.contains("content policy")));
    }

    #[tokio::test]
    async fn test_canned_content() {
        let ai = FakeAi::new(false);
        let (state, clock) = setup(ai.clone());

        let outcome = resolve(&state, user(9), InteractionMode::Idle, MenuAction::English)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Text(t!("messages.english").to_string()));

        clock.advance(Duration::seconds(3));
        let outcome = resolve(&state, user(9), InteractionMode::Idle, MenuAction::Prava)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Text(t!("messages.prava").to_string()));
        assert_eq!(ai.calls(), 0);
        assert_eq!(state.services.ledger.get_or_create(user(9)).await.unwrap().requests_today, 0);
    }
}
