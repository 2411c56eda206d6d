//! The "search for keyword X" flow: fetch once, render everything, paginate.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::info;

use crate::{
    card::{render, CardStyle},
    fetch::PostSource,
    pager::{paginate, PagerState},
};

#[derive(Clone, Debug)]
pub enum SearchOutcome {
    NoResults { keyword: String },
    Results(PagerState),
}

pub struct SearchService {
    source: Arc<dyn PostSource>,
    style: CardStyle,
    pager_timeout: Duration,
}

impl SearchService {
    pub fn new(
        source: Arc<dyn PostSource>,
        footer: impl Into<String>,
        pager_timeout: Duration,
    ) -> Self {
        let style = CardStyle {
            excerpt_format: source.excerpt_format(),
            footer: footer.into(),
        };
        Self {
            source,
            style,
            pager_timeout,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn search(&self, keyword: &str) -> SearchOutcome {
        let keyword = keyword.trim();
        let posts = self.source.fetch(keyword).await;
        let cards = posts.iter().map(|p| render(p, &self.style)).collect();

        match paginate(cards, self.pager_timeout, Instant::now()) {
            Some(pager) => {
                info!(keyword, cards = pager.len(), "search produced results");
                SearchOutcome::Results(pager)
            }
            None => {
                info!(keyword, "search produced no results");
                SearchOutcome::NoResults {
                    keyword: keyword.to_string(),
                }
            }
        }
    }
}

/// Notice shown when a search comes back empty (or the source was unreachable).
pub fn no_results_notice(keyword: &str) -> String {
    format!(
        "❌ No results found for <b>{}</b>.",
        crate::formatting::escape_html(keyword)
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        errors::Error,
        fetch::{api::parse_search_response, feed::parse_feed, ExcerptFormat},
        model::PostRecord,
        pager::{Navigation, PagerPhase},
        Result,
    };

    /// Serves canned records and remembers the keywords it was asked for.
    struct Canned {
        format: ExcerptFormat,
        posts: Result<Vec<PostRecord>>,
        seen: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(format: ExcerptFormat, posts: Result<Vec<PostRecord>>) -> Arc<Self> {
            Arc::new(Self {
                format,
                posts,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PostSource for Canned {
        fn name(&self) -> &'static str {
            "canned"
        }
        fn excerpt_format(&self) -> ExcerptFormat {
            self.format
        }
        async fn try_fetch(&self, keyword: &str) -> Result<Vec<PostRecord>> {
            self.seen.lock().unwrap().push(keyword.to_string());
            match &self.posts {
                Ok(p) => Ok(p.clone()),
                Err(e) => Err(Error::SourceUnreachable(e.to_string())),
            }
        }
    }

    fn service(source: Arc<Canned>) -> SearchService {
        SearchService::new(source, "Source: blog.example", Duration::from_secs(60))
    }

    #[tokio::test]
    async fn no_matches_means_no_pager() {
        let src = Canned::new(ExcerptFormat::Plain, Ok(Vec::new()));
        match service(src).search("nothing").await {
            SearchOutcome::NoResults { keyword } => assert_eq!(keyword, "nothing"),
            SearchOutcome::Results(_) => panic!("expected no results"),
        }
    }

    #[tokio::test]
    async fn unreachable_source_looks_like_no_matches() {
        let src = Canned::new(
            ExcerptFormat::Plain,
            Err(Error::SourceUnreachable("upstream returned 500".to_string())),
        );
        assert!(matches!(
            service(src).search("rust").await,
            SearchOutcome::NoResults { .. }
        ));
    }

    #[tokio::test]
    async fn keyword_is_trimmed_and_fetched_once() {
        let src = Canned::new(ExcerptFormat::Plain, Ok(Vec::new()));
        let svc = service(src.clone());
        svc.search("  rust  ").await;
        assert_eq!(*src.seen.lock().unwrap(), vec!["rust".to_string()]);
    }

    #[tokio::test]
    async fn api_scenario_renders_single_card() {
        let body = r#"{"posts":[{"title":"A","URL":"http://x/1","excerpt":"<p><strong>Hi</strong></p>"}]}"#;
        let posts = parse_search_response(body, None).unwrap();
        let src = Canned::new(ExcerptFormat::Html, Ok(posts));

        let SearchOutcome::Results(pager) = service(src).search("hi").await else {
            panic!("expected results");
        };
        assert_eq!(pager.len(), 1);
        assert_eq!(pager.index(), 0);
        let card = pager.current();
        assert_eq!(card.description, "**Hi**");
        assert_eq!(card.title, "A");
        assert_eq!(card.url, "http://x/1");
    }

    #[tokio::test]
    async fn feed_scenario_pages_two_entries() {
        let xml = r#"<rss version="2.0"><channel><title>t</title><link>https://x</link><description>d</description>
            <item><title>one</title><link>https://x/1</link><description>s1</description></item>
            <item><title>two</title><link>https://x/2</link><description>s2</description></item>
        </channel></rss>"#;
        let posts = parse_feed(xml.as_bytes()).unwrap();
        let src = Canned::new(ExcerptFormat::Plain, Ok(posts));

        let SearchOutcome::Results(mut pager) = service(src).search("x").await else {
            panic!("expected results");
        };
        assert_eq!(pager.len(), 2);
        assert_eq!(pager.current().title, "one");

        let now = Instant::now();
        assert_eq!(pager.advance_at(now), Navigation::Moved(1));
        assert_eq!(pager.current().title, "two");
        assert_eq!(pager.advance_at(now), Navigation::Unchanged);
        assert_eq!(pager.phase_at(now), PagerPhase::Active(1));
    }

    #[test]
    fn notice_escapes_keyword() {
        assert_eq!(
            no_results_notice("<script>"),
            "❌ No results found for <b>&lt;script&gt;</b>."
        );
    }
}
