use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{debug, warn};

use blogbot_core::{
    domain::{ChatId, MessageId, MessageRef},
    messaging::{
        port::MessagingPort,
        types::{parse_pager_callback, InlineKeyboard},
    },
    pager::{Direction, Navigation, PagerRegistry},
};

use crate::{clock_now, router::AppState};

const EXPIRED_NOTICE: &str = "This result list has expired. Search again.";

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let cb_id = q.id.clone();
    let data = q.data.clone().unwrap_or_default();

    // Always answer callback query eventually.
    let (Some(direction), Some(message)) = (parse_pager_callback(&data), q.message.as_ref())
    else {
        answer(state.messenger.as_ref(), &cb_id, None).await;
        return Ok(());
    };

    let msg = MessageRef {
        chat_id: ChatId(message.chat.id.0),
        message_id: MessageId(message.id.0),
    };

    turn_page(&state.pagers, state.messenger.as_ref(), msg, direction, &cb_id).await;
    Ok(())
}

/// Run one navigation request against the registry and reflect it in the chat.
async fn turn_page(
    pagers: &PagerRegistry,
    messenger: &dyn MessagingPort,
    msg: MessageRef,
    direction: Direction,
    cb_id: &str,
) {
    let result = pagers.navigate(msg, direction, clock_now()).await;
    debug!(
        chat_id = msg.chat_id.0,
        message_id = msg.message_id.0,
        ?direction,
        outcome = ?result.outcome,
        "pager navigation"
    );

    match result.outcome {
        Navigation::Moved(_) => {
            if let Some(html) = result.html {
                if let Err(e) = messenger
                    .edit_inline_keyboard(msg, &html, InlineKeyboard::pager())
                    .await
                {
                    warn!(error = %e, "failed to re-render pager card");
                }
            }
            answer(messenger, cb_id, None).await;
        }
        Navigation::Unchanged => answer(messenger, cb_id, None).await,
        Navigation::Expired => {
            // Controls should already be gone; strip them in case the timer lost the race.
            if let Err(e) = messenger.clear_keyboard(msg).await {
                debug!(error = %e, "failed to clear expired pager keyboard");
            }
            answer(messenger, cb_id, Some(EXPIRED_NOTICE)).await;
        }
    }
}

async fn answer(messenger: &dyn MessagingPort, cb_id: &str, text: Option<&str>) {
    if let Err(e) = messenger.answer_callback_query(cb_id, text).await {
        debug!(error = %e, "failed to answer callback query");
    }
}
