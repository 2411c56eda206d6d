//! Normalized records produced by every fetch strategy.

use chrono::{DateTime, Utc};

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// One blog article surfaced by a search.
///
/// Records are immutable once produced; the sequence returned by a fetch is
/// fixed for the lifetime of the pager built from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostRecord {
    pub title: String,
    /// Canonical link to the article (may be empty).
    pub url: String,
    /// Teaser text. HTML-bearing for the API source, plain otherwise.
    pub excerpt: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

impl PostRecord {
    /// Builds a record, substituting the placeholder title when `title` is blank.
    pub fn new(title: Option<String>, url: Option<String>, excerpt: Option<String>) -> Self {
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());
        Self {
            title,
            url: url.map(|u| u.trim().to_string()).unwrap_or_default(),
            excerpt: excerpt.unwrap_or_default(),
            author: None,
            image_url: None,
            published: None,
        }
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_image(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_published(mut self, published: Option<DateTime<Utc>>) -> Self {
        self.published = published;
        self
    }
}
