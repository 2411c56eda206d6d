use std::sync::Arc;

use tracing::info;

use blogbot_core::{config::Config, fetch::build_source, search::SearchService};

#[tokio::main]
async fn main() -> Result<(), blogbot_core::Error> {
    blogbot_core::logging::init("blogbot")?;

    let cfg = Arc::new(Config::load()?);

    let source = build_source(&cfg)?;
    info!(source = source.name(), blog = %cfg.blog_site, "post source ready");
    let search = Arc::new(SearchService::new(
        source,
        cfg.source_label(),
        cfg.pager_timeout,
    ));

    blogbot_telegram::router::run_polling(cfg, search)
        .await
        .map_err(|e| blogbot_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
