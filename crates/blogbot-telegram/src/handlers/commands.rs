use std::sync::Arc;

use teloxide::{prelude::*, types::ChatAction};
use tracing::{debug, error, info};

use blogbot_core::{
    delivery::deliver,
    domain::ChatId,
    formatting::{escape_html, truncate_chars},
};

use crate::expiry::spawn_expiry_watch;
use crate::router::AppState;

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Search(String),
    Usage,
}

/// Commands this bot answers. Anything else may belong to another bot in
/// the same group, so it gets no reply.
fn recognize(text: &str) -> Option<Command> {
    let (cmd, args) = parse_command(text);
    match cmd.as_str() {
        "search" | "buscar" => Some(Command::Search(args)),
        "start" | "help" => Some(Command::Usage),
        _ => None,
    }
}

fn usage_html(blog_site: &str) -> String {
    format!(
        "🔎 <b>Blog search</b>\n\n\
Search the posts of <b>{}</b>:\n\
<code>/search keyword</code>\n\n\
Use ◀️ / ▶️ under the result to browse up to 10 matches.",
        escape_html(blog_site)
    )
}

pub async fn handle_command(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = ChatId(msg.chat.id.0);

    match recognize(text) {
        Some(Command::Search(keyword)) => handle_search(bot, chat_id, keyword, state).await,
        Some(Command::Usage) => {
            send_notice(&state, chat_id, &usage_html(&state.cfg.blog_site)).await;
            Ok(())
        }
        None => {
            debug!(chat_id = chat_id.0, text, "ignoring unrecognized command");
            Ok(())
        }
    }
}

async fn handle_search(
    bot: Bot,
    chat_id: ChatId,
    keyword: String,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    if keyword.is_empty() {
        send_notice(&state, chat_id, "Usage: <code>/search keyword</code>").await;
        return Ok(());
    }

    // Typing indicator while the upstream call runs (best-effort).
    let _ = bot
        .send_chat_action(teloxide::types::ChatId(chat_id.0), ChatAction::Typing)
        .await;

    info!(chat_id = chat_id.0, keyword = %keyword, "search requested");
    let outcome = state.search.search(&keyword).await;

    let publish_to = state.cfg.publish_channel_id.map(ChatId);
    match deliver(
        outcome,
        &keyword,
        chat_id,
        publish_to,
        state.messenger.as_ref(),
        &state.pagers,
    )
    .await
    {
        Ok(delivery) => {
            if let Some(m) = delivery.pager_message() {
                spawn_expiry_watch(state.clone(), m);
            }
        }
        Err(e) => {
            error!(chat_id = chat_id.0, error = %e, "failed to deliver search results");
            let msg_txt = truncate_chars(&e.to_string(), 200);
            send_notice(
                &state,
                chat_id,
                &format!("❌ Error: {}", escape_html(&msg_txt)),
            )
            .await;
        }
    }

    Ok(())
}

async fn send_notice(state: &AppState, chat_id: ChatId, html: &str) {
    if let Err(e) = state.messenger.send_html(chat_id, html).await {
        error!(chat_id = chat_id.0, error = %e, "failed to send notice");
    }
}
