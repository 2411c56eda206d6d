//! Hand a [`SearchOutcome`] to the chat platform.
//!
//! Sends the first card with pager controls (to the requester, or to the
//! configured publish channel) and registers the pager under the sent
//! message. Expiry timers are the dispatcher's job.

use tracing::{error, warn};

use crate::{
    domain::{ChatId, MessageRef},
    errors::Error,
    formatting::escape_html,
    messaging::{port::MessagingPort, types::InlineKeyboard},
    pager::PagerRegistry,
    search::{no_results_notice, SearchOutcome},
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    NoResults,
    /// Shown to the requester; pager registered under this message.
    Shown(MessageRef),
    /// Posted to the publish channel; pager registered under this message.
    Published(MessageRef),
    /// The publish channel rejected the message. Requester was warned.
    DestinationUnreachable,
}

impl Delivery {
    /// The message now carrying live pager controls, if any.
    pub fn pager_message(&self) -> Option<MessageRef> {
        match self {
            Delivery::Shown(m) | Delivery::Published(m) => Some(*m),
            Delivery::NoResults | Delivery::DestinationUnreachable => None,
        }
    }
}

pub async fn deliver(
    outcome: SearchOutcome,
    keyword: &str,
    requester: ChatId,
    publish_to: Option<ChatId>,
    messenger: &dyn MessagingPort,
    pagers: &PagerRegistry,
) -> Result<Delivery> {
    let pager = match outcome {
        SearchOutcome::NoResults { keyword } => {
            messenger
                .send_html(requester, &no_results_notice(&keyword))
                .await?;
            return Ok(Delivery::NoResults);
        }
        SearchOutcome::Results(pager) => pager,
    };

    let html = pager.current_html();
    let Some(channel) = publish_to else {
        let msg = messenger
            .send_inline_keyboard(requester, &html, InlineKeyboard::pager())
            .await?;
        pagers.insert(msg, pager).await;
        return Ok(Delivery::Shown(msg));
    };

    match messenger
        .send_inline_keyboard(channel, &html, InlineKeyboard::pager())
        .await
    {
        Ok(msg) => {
            pagers.insert(msg, pager).await;
            let notice = format!(
                "✅ Results for <b>{}</b> published to the channel.",
                escape_html(keyword)
            );
            if let Err(e) = messenger.send_html(requester, &notice).await {
                warn!(error = %e, "failed to confirm publish to requester");
            }
            Ok(Delivery::Published(msg))
        }
        Err(e) => {
            let e = Error::DestinationUnreachable(format!("channel {}: {e}", channel.0));
            error!(error = %e, keyword, "could not publish search results");
            messenger
                .send_html(
                    requester,
                    "⚠️ Could not publish the results: the destination channel is unreachable.",
                )
                .await?;
            Ok(Delivery::DestinationUnreachable)
        }
    }
}
