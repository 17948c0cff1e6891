use crate::{
    service::{
        ai::AiProvider,
        dialogue::model::InteractionMode,
        ledger::LedgerError,
        user::AccountId,
    },
    state::AppState,
};

use super::Outcome;

/// Free text sent while a mode is active. Metered modes are charged before the AI call.
pub(super) async fn handle_prompt(
    state: &AppState,
    user_id: AccountId,
    mode: InteractionMode,
    prompt: &str,
) -> Result<Outcome, LedgerError> {
    match mode {
        InteractionMode::Idle => Ok(Outcome::Text(t!("messages.choose_from_menu").to_string())),
        InteractionMode::Chat => {
            let account = state.services.usage.charge(user_id).await?;
            debug!("user {} chat request #{}", user_id, account.requests_today);
            Ok(answer_chat(state.services.ai.as_ref(), prompt).await)
        }
        InteractionMode::Image => {
            let account = state.services.usage.charge(user_id).await?;
            debug!("user {} image request #{}", user_id, account.requests_today);
            Ok(answer_image(state.services.ai.as_ref(), prompt).await)
        }
    }
}

async fn answer_chat(ai: &dyn AiProvider, prompt: &str) -> Outcome {
    match ai.chat(prompt).await {
        Ok(answer) => Outcome::Text(answer),
        Err(e) => {
            warn!("Chat completion failed: {}", e);
            Outcome::Text(t!("messages.ai_error", error = e.to_string()).to_string())
        }
    }
}

async fn answer_image(ai: &dyn AiProvider, prompt: &str) -> Outcome {
    match ai.image(prompt).await {
        Ok(image) => Outcome::Image(image),
        Err(e) => {
            warn!("Image generation failed: {}", e);
            Outcome::Text(t!("messages.image_error", error = e.to_string()).to_string())
        }
    }
}
