use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::service::dialogue::model::{BUTTON_ASK, BUTTON_DRAW, BUTTON_ENGLISH, BUTTON_PRAVA, BUTTON_PRO, BUTTON_STATS};

pub fn get_main_menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new([
        [KeyboardButton::new(BUTTON_ASK), KeyboardButton::new(BUTTON_DRAW)],
        [KeyboardButton::new(BUTTON_ENGLISH), KeyboardButton::new(BUTTON_PRAVA)],
        [KeyboardButton::new(BUTTON_PRO), KeyboardButton::new(BUTTON_STATS)],
    ])
    .resize_keyboard()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::dialogue::model::MenuAction;

    #[test]
    fn test_every_button_classifies_as_menu_action() {
        let keyboard = get_main_menu_keyboard();

        assert_eq!(keyboard.keyboard.len(), 3);
        for button in keyboard.keyboard.iter().flatten() {
            assert!(!matches!(MenuAction::classify(&button.text), MenuAction::Prompt(_)));
        }
    }
}
