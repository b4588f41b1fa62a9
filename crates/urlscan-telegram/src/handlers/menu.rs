use urlscan_core::messaging::types::{InlineButton, InlineKeyboard};

pub const FIRST_MENU: &str = "<b>Menu 1</b>\n\nA beautiful menu with a shiny inline button.";
pub const SECOND_MENU: &str =
    "<b>Menu 2</b>\n\nA better menu with even more shiny inline buttons.";

pub const NEXT_BUTTON: &str = "Next";
pub const BACK_BUTTON: &str = "Back";
pub const TUTORIAL_BUTTON: &str = "Tutorial";
pub const TUTORIAL_URL: &str = "https://core.telegram.org/bots/tutorial";

pub fn first_menu_markup() -> InlineKeyboard {
    InlineKeyboard::row(vec![InlineButton::callback(NEXT_BUTTON, NEXT_BUTTON)])
}

pub fn second_menu_markup() -> InlineKeyboard {
    InlineKeyboard::row(vec![
        InlineButton::callback(BACK_BUTTON, BACK_BUTTON),
        InlineButton::url(TUTORIAL_BUTTON, TUTORIAL_URL),
    ])
}

/// Page to show for a callback payload, if it belongs to the menu.
pub fn page_for(data: &str) -> Option<(&'static str, InlineKeyboard)> {
    match data {
        NEXT_BUTTON => Some((SECOND_MENU, second_menu_markup())),
        BACK_BUTTON => Some((FIRST_MENU, first_menu_markup())),
        _ => None,
    }
}
