use teloxide::adaptors::Throttle;
use teloxide::dispatching::{HandlerExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::{types::Message, Bot};

use crate::command::Command;
use crate::error::{BotError, HandlerResult};
use crate::service::dialogue::model::InteractionMode;
use crate::service::user::AccountId;
use crate::state::AppState;

use super::keyboard::get_main_menu_keyboard;
use super::message::stats_text;
use super::payment::send_pro_invoice;
use super::ModeDialogue;

async fn handle_start(bot: Throttle<Bot>, dialogue: ModeDialogue, msg: Message) -> HandlerResult<()> {
    bot.send_message(msg.chat.id, t!("commands.start"))
        .reply_markup(get_main_menu_keyboard())
        .await?;

    dialogue
        .update(InteractionMode::Idle)
        .await
        .map_err(|e| BotError::DialogueStateError(e.to_string()))?;

    Ok(())
}

async fn handle_help(bot: Throttle<Bot>, msg: Message, state: AppState) -> HandlerResult<()> {
    bot.send_message(
        msg.chat.id,
        t!("commands.help", limit = state.services.usage.daily_limit()),
    )
    .reply_markup(get_main_menu_keyboard())
    .await?;

    Ok(())
}

async fn handle_stats(bot: Throttle<Bot>, msg: Message, state: AppState) -> HandlerResult<()> {
    let user_id = match AccountId::from_sender(msg.from.as_ref()) {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!("Dropping /stats in chat {}: {}", msg.chat.id, e);
            return Ok(());
        }
    };

    let text = match state.services.ledger.get_or_create(user_id).await {
        Ok(account) => stats_text(&account),
        Err(e) => {
            error!("Failed to load stats for user {}: {}", user_id, e);
            t!("messages.unavailable").to_string()
        }
    };

    bot.send_message(msg.chat.id, text).await?;

    Ok(())
}

async fn handle_command(
    bot: Throttle<Bot>,
    msg: Message,
    cmd: Command,
    dialogue: ModeDialogue,
    state: AppState,
) -> HandlerResult<()> {
    match cmd {
        Command::Start => handle_start(bot, dialogue, msg).await?,
        Command::Help => handle_help(bot, msg, state).await?,
        Command::Stats => handle_stats(bot, msg, state).await?,
        Command::Pro => send_pro_invoice(&bot, msg.chat.id, &state).await?,
    }

    Ok(())
}

pub fn get_command_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command)
}
