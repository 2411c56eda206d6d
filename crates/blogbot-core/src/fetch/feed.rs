//! Keyword-scoped syndication feed (`/search/<keyword>/feed/`).

use async_trait::async_trait;

use crate::{
    errors::Error,
    fetch::{send_ok, ExcerptFormat, PostSource, MAX_RESULTS},
    model::PostRecord,
    Result,
};

pub struct FeedSource {
    http: reqwest::Client,
    site: String,
}

impl FeedSource {
    pub fn new(http: reqwest::Client, site: &str) -> Self {
        Self {
            http,
            site: site.to_string(),
        }
    }

    /// The keyword is percent-encoded into the path, not passed as a query.
    pub fn feed_url(&self, keyword: &str) -> String {
        format!(
            "https://{}/search/{}/feed/",
            self.site,
            urlencoding::encode(keyword)
        )
    }
}

#[async_trait]
impl PostSource for FeedSource {
    fn name(&self) -> &'static str {
        "feed"
    }

    fn excerpt_format(&self) -> ExcerptFormat {
        ExcerptFormat::Plain
    }

    async fn try_fetch(&self, keyword: &str) -> Result<Vec<PostRecord>> {
        let bytes = send_ok(self.http.get(self.feed_url(keyword)))
            .await?
            .bytes()
            .await
            .map_err(|e| Error::SourceUnreachable(format!("failed to read feed body: {e}")))?;

        parse_feed(&bytes)
    }
}

/// Map feed entries to records in document order. Feeds carry no image.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<PostRecord>> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|e| Error::MalformedSource(format!("failed to parse feed: {e}")))?;

    Ok(feed
        .entries
        .into_iter()
        .take(MAX_RESULTS)
        .map(|entry| {
            PostRecord::new(
                entry.title.map(|t| t.content),
                entry.links.first().map(|l| l.href.clone()),
                entry.summary.map(|s| s.content),
            )
            .with_published(entry.published.or(entry.updated))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_ENTRIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Search results for rust</title>
    <link>https://blog.example</link>
    <description>feed</description>
    <item>
      <title>Entry one</title>
      <link>https://blog.example/one/</link>
      <description>First summary</description>
      <pubDate>Mon, 01 Jan 2024 10:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Entry two</title>
      <link>https://blog.example/two/</link>
      <description>Second summary</description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn maps_entries_in_order() {
        let posts = parse_feed(TWO_ENTRIES.as_bytes()).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Entry one");
        assert_eq!(posts[0].url, "https://blog.example/one/");
        assert_eq!(posts[0].excerpt, "First summary");
        assert!(posts[0].published.is_some());
        assert_eq!(posts[1].title, "Entry two");
        assert!(posts.iter().all(|p| p.image_url.is_none()));
        assert!(posts.iter().all(|p| p.author.is_none()));
    }

    #[test]
    fn empty_channel_is_empty() {
        let xml = r#"<rss version="2.0"><channel><title>t</title><link>https://x</link><description>d</description></channel></rss>"#;
        assert!(parse_feed(xml.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_malformed() {
        let err = parse_feed(b"not a feed").unwrap_err();
        assert!(matches!(err, Error::MalformedSource(_)));
    }

    #[test]
    fn keyword_is_percent_encoded_into_path() {
        let src = FeedSource::new(reqwest::Client::new(), "blog.example");
        assert_eq!(
            src.feed_url("café con leche"),
            "https://blog.example/search/caf%C3%A9%20con%20leche/feed/"
        );
    }
}
