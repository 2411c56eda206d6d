//! Telegram update handlers.
//!
//! Each handler is a small adapter that:
//! - parses the incoming update
//! - calls into `blogbot-core` (search, delivery, pager transitions)
//! - reports back through the messaging port

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};
use tracing::debug;

use crate::router::AppState;

mod callback;
mod commands;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    callback::handle_callback(q, state).await
}

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    if let Some(text) = msg.text() {
        if text.starts_with('/') {
            return commands::handle_command(bot, msg, state).await;
        }
    }

    debug!(chat_id = msg.chat.id.0, "ignoring non-command message");
    Ok(())
}
