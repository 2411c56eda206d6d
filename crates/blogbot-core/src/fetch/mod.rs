//! Fetcher: one outbound call per search, normalized to [`PostRecord`]s.
//!
//! Three interchangeable strategies live behind [`PostSource`]; a deployment
//! picks exactly one via [`build_source`]. Every failure is contained here
//! and surfaces to callers as an empty result.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    config::{Config, SourceKind},
    errors::Error,
    model::PostRecord,
    Result,
};

pub mod api;
pub mod feed;
pub mod scrape;

pub use api::ApiSource;
pub use feed::FeedSource;
pub use scrape::ScrapeSource;

/// Upper bound on records returned by any strategy.
pub const MAX_RESULTS: usize = 10;

/// Whether a source hands back excerpts with HTML wrappers that need cleaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExcerptFormat {
    Html,
    Plain,
}

/// Hexagonal port for "search the blog for a keyword".
#[async_trait]
pub trait PostSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn excerpt_format(&self) -> ExcerptFormat;

    /// Issue the upstream request and parse it. No retry.
    async fn try_fetch(&self, keyword: &str) -> Result<Vec<PostRecord>>;

    /// Up to [`MAX_RESULTS`] records in upstream order; empty on any failure.
    async fn fetch(&self, keyword: &str) -> Vec<PostRecord> {
        match self.try_fetch(keyword).await {
            Ok(mut posts) => {
                posts.truncate(MAX_RESULTS);
                info!(source = self.name(), keyword, results = posts.len(), "fetched posts");
                posts
            }
            Err(e) => {
                warn!(source = self.name(), keyword, error = %e, "fetch failed, treating as no results");
                Vec::new()
            }
        }
    }
}

/// Select the configured strategy.
pub fn build_source(cfg: &Config) -> Result<Arc<dyn PostSource>> {
    let http = http_client(cfg)?;
    let source: Arc<dyn PostSource> = match cfg.source {
        SourceKind::Api => Arc::new(ApiSource::new(
            http,
            &cfg.blog_site,
            cfg.default_image.clone(),
        )),
        SourceKind::Scrape => Arc::new(ScrapeSource::new(http, &cfg.blog_site)?),
        SourceKind::Feed => Arc::new(FeedSource::new(http, &cfg.blog_site)),
    };
    Ok(source)
}

fn http_client(cfg: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(cfg.http_timeout)
        .user_agent(concat!("blogbot/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::External(format!("http client build failed: {e}")))
}

/// Send a request and require a success status.
pub(crate) async fn send_ok(req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
    let resp = req
        .send()
        .await
        .map_err(|e| Error::SourceUnreachable(format!("request failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(Error::SourceUnreachable(format!(
            "upstream returned {}",
            resp.status()
        )));
    }
    Ok(resp)
}

/// Collapse runs of whitespace (HTML text nodes are full of them).
pub(crate) fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl PostSource for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn excerpt_format(&self) -> ExcerptFormat {
            ExcerptFormat::Plain
        }
        async fn try_fetch(&self, _keyword: &str) -> Result<Vec<PostRecord>> {
            Err(Error::SourceUnreachable("upstream returned 503".to_string()))
        }
    }

    struct Many;

    #[async_trait]
    impl PostSource for Many {
        fn name(&self) -> &'static str {
            "many"
        }
        fn excerpt_format(&self) -> ExcerptFormat {
            ExcerptFormat::Plain
        }
        async fn try_fetch(&self, _keyword: &str) -> Result<Vec<PostRecord>> {
            Ok((0..25)
                .map(|i| PostRecord::new(Some(format!("post {i}")), None, None))
                .collect())
        }
    }

    #[tokio::test]
    async fn failures_become_empty() {
        assert!(Failing.fetch("rust").await.is_empty());
    }

    #[tokio::test]
    async fn results_are_capped_in_order() {
        let posts = Many.fetch("rust").await;
        assert_eq!(posts.len(), MAX_RESULTS);
        assert_eq!(posts[0].title, "post 0");
        assert_eq!(posts[9].title, "post 9");
    }

    #[test]
    fn whitespace_is_squashed() {
        assert_eq!(squash_whitespace("  a \n\t b  "), "a b");
    }
}
