use crate::pager::Direction;

pub const PAGER_CALLBACK_PREFIX: &str = "pager:";

/// Inline keyboard (buttons) attached to a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineKeyboard {
    /// Buttons laid out left to right on a single row.
    pub buttons: Vec<InlineButton>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineKeyboard {
    pub fn new(buttons: Vec<InlineButton>) -> Self {
        Self { buttons }
    }

    /// The two pager controls, "previous" then "next".
    pub fn pager() -> Self {
        Self::new(vec![
            InlineButton {
                label: "◀️ Previous".to_string(),
                callback_data: pager_callback_data(Direction::Previous),
            },
            InlineButton {
                label: "Next ▶️".to_string(),
                callback_data: pager_callback_data(Direction::Next),
            },
        ])
    }
}

pub fn pager_callback_data(direction: Direction) -> String {
    let dir = match direction {
        Direction::Previous => "prev",
        Direction::Next => "next",
    };
    format!("{PAGER_CALLBACK_PREFIX}{dir}")
}

/// Parse `pager:prev` / `pager:next`. Anything else is not a pager callback.
pub fn parse_pager_callback(data: &str) -> Option<Direction> {
    match data.strip_prefix(PAGER_CALLBACK_PREFIX)? {
        "prev" => Some(Direction::Previous),
        "next" => Some(Direction::Next),
        _ => None,
    }
}
