//! WordPress.com public REST search (`/rest/v1.1/sites/<site>/posts`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    errors::Error,
    fetch::{send_ok, ExcerptFormat, PostSource, MAX_RESULTS},
    model::{PostRecord, UNKNOWN_AUTHOR},
    Result,
};

const API_BASE: &str = "https://public-api.wordpress.com/rest/v1.1/sites";

pub struct ApiSource {
    http: reqwest::Client,
    endpoint: String,
    default_image: Option<String>,
}

impl ApiSource {
    pub fn new(http: reqwest::Client, site: &str, default_image: Option<String>) -> Self {
        Self {
            http,
            endpoint: format!("{API_BASE}/{site}/posts"),
            default_image,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PostSource for ApiSource {
    fn name(&self) -> &'static str {
        "api"
    }

    fn excerpt_format(&self) -> ExcerptFormat {
        ExcerptFormat::Html
    }

    async fn try_fetch(&self, keyword: &str) -> Result<Vec<PostRecord>> {
        let number = MAX_RESULTS.to_string();
        let req = self
            .http
            .get(&self.endpoint)
            .query(&[("number", number.as_str()), ("search", keyword)]);
        let body = send_ok(req)
            .await?
            .text()
            .await
            .map_err(|e| Error::SourceUnreachable(format!("failed to read body: {e}")))?;

        parse_search_response(&body, self.default_image.as_deref())
    }
}

/// Map the `{"posts": [...]}` envelope to records.
///
/// Missing fields fall back to defaults; a missing `posts` array is "no matches".
pub fn parse_search_response(body: &str, default_image: Option<&str>) -> Result<Vec<PostRecord>> {
    let v: Value = serde_json::from_str(body)
        .map_err(|e| Error::MalformedSource(format!("search response is not json: {e}")))?;

    let Some(posts) = v.get("posts").and_then(|p| p.as_array()) else {
        return Ok(Vec::new());
    };

    Ok(posts
        .iter()
        .take(MAX_RESULTS)
        .map(|p| post_from_json(p, default_image))
        .collect())
}

fn post_from_json(p: &Value, default_image: Option<&str>) -> PostRecord {
    let author = p
        .get("author")
        .and_then(|a| a.get("name"))
        .and_then(str_field)
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let image = p
        .get("featured_image")
        .and_then(str_field)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| default_image.map(str::to_string));

    let published = p
        .get("date")
        .and_then(|d| d.as_str())
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|d| d.with_timezone(&Utc));

    PostRecord::new(
        p.get("title").and_then(str_field),
        p.get("URL").and_then(str_field),
        p.get("excerpt").and_then(str_field),
    )
    .with_author(Some(author))
    .with_image(image)
    .with_published(published)
}

fn str_field(v: &Value) -> Option<String> {
    v.as_str().map(str::to_string)
}
