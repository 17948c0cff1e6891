mod command;
mod keyboard;
mod message;
mod payment;
#[cfg(test)]
mod test;

use command::get_command_handler;
use message::{get_message_handler, handle_message_unknown};
use payment::{get_pre_checkout_handler, get_successful_payment_handler};
use teloxide::{
    dispatching::{
        dialogue::{self, ErasedStorage},
        UpdateFilterExt, UpdateHandler,
    },
    dptree,
    prelude::Dialogue,
    types::Update,
};

use crate::service::dialogue::model::InteractionMode;

pub type ModeDialogue = Dialogue<InteractionMode, ErasedStorage<InteractionMode>>;

pub fn get_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    // Pre-checkout queries carry no chat, so they cannot enter a dialogue.
    dptree::entry().branch(get_pre_checkout_handler()).branch(
        dialogue::enter::<Update, ErasedStorage<InteractionMode>, InteractionMode, _>()
            .branch(get_command_handler())
            .branch(get_successful_payment_handler())
            .branch(get_message_handler())
            .branch(Update::filter_message().endpoint(handle_message_unknown)),
    )
}
