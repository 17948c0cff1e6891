use serde::{Deserialize, Serialize};

/// What the next free-text message from a user is meant for.
#[derive(Clone, Copy, Default, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Idle,
    Chat,
    Image,
}

pub const BUTTON_ASK: &str = "🤖 Savol";
pub const BUTTON_DRAW: &str = "🎨 Rasm";
pub const BUTTON_ENGLISH: &str = "📘 English";
pub const BUTTON_PRAVA: &str = "🚗 Prava";
pub const BUTTON_PRO: &str = "⭐ PRO";
pub const BUTTON_STATS: &str = "📊 Statistika";

/// A text message classified once against the reply keyboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Ask,
    Draw,
    English,
    Prava,
    Pro,
    Stats,
    Prompt(String),
}

impl MenuAction {
    pub fn classify(text: &str) -> Self {
        match text {
            BUTTON_ASK => Self::Ask,
            BUTTON_DRAW => Self::Draw,
            BUTTON_ENGLISH => Self::English,
            BUTTON_PRAVA => Self::Prava,
            BUTTON_PRO => Self::Pro,
            BUTTON_STATS => Self::Stats,
            other => Self::Prompt(other.to_string()),
        }
    }

    /// Whether an exhausted free quota blocks this action.
    ///
    /// Buying PRO and checking usage stay reachable for users who ran out.
    pub fn is_quota_gated(&self) -> bool {
        !matches!(self, Self::Pro | Self::Stats)
    }
}
