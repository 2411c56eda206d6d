use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use blogbot_core::{
    config::Config, messaging::port::MessagingPort, pager::PagerRegistry, search::SearchService,
};

use crate::handlers;
use crate::TelegramMessenger;

/// Shared dependencies injected into every handler.
///
/// The dispatcher owns the pager registry; handlers only run transitions on it.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub search: Arc<SearchService>,
    pub messenger: Arc<dyn MessagingPort>,
    pub pagers: Arc<PagerRegistry>,
}

pub async fn run_polling(cfg: Arc<Config>, search: Arc<SearchService>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    match bot.get_me().await {
        Ok(me) => info!(username = %me.username(), "blogbot started"),
        Err(e) => warn!(error = %e, "get_me failed, continuing"),
    }
    info!(
        blog = %cfg.blog_site,
        source = search.source_name(),
        application_id = cfg.application_id.as_deref().unwrap_or("-"),
        publish_channel = ?cfg.publish_channel_id,
        pager_timeout_secs = cfg.pager_timeout.as_secs(),
        "configuration loaded"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));

    let state = Arc::new(AppState {
        cfg,
        search,
        messenger,
        pagers: Arc::new(PagerRegistry::new()),
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
