use std::sync::Arc;

use tracing::debug;

use blogbot_core::{
    domain::MessageRef,
    messaging::port::MessagingPort,
    pager::{Expiry, PagerRegistry},
};

use crate::{clock_now, router::AppState};

/// Watch one pager and strip its buttons once it has been idle for the
/// configured window.
pub fn spawn_expiry_watch(state: Arc<AppState>, msg: MessageRef) {
    tokio::spawn(async move {
        watch_until_idle(&state.pagers, state.messenger.as_ref(), msg).await;
    });
}

/// Navigation pushes the deadline out, so re-check on every wake instead of
/// trusting the first deadline. Returns once the pager is gone.
pub async fn watch_until_idle(
    pagers: &PagerRegistry,
    messenger: &dyn MessagingPort,
    msg: MessageRef,
) {
    loop {
        match pagers.expire_if_idle(msg, clock_now()).await {
            Expiry::Pending(deadline) => {
                tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
            }
            Expiry::Expired => {
                debug!(chat_id = msg.chat_id.0, message_id = msg.message_id.0, "pager expired");
                if let Err(e) = messenger.clear_keyboard(msg).await {
                    debug!(error = %e, "failed to clear expired pager keyboard");
                }
                return;
            }
            Expiry::Missing => return,
        }
    }
}
