//! Scrape the blog's own search results page (`/?s=<keyword>`).

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{
    errors::Error,
    fetch::{send_ok, squash_whitespace, ExcerptFormat, PostSource, MAX_RESULTS},
    model::PostRecord,
    Result,
};

/// Article headings as rendered by stock WordPress themes.
const HEADING_SELECTOR: &str = "h1.entry-title, h2.entry-title";
/// Fallback for themes that don't mark up their headings.
const FALLBACK_HEADING_SELECTOR: &str = "article h2";

pub struct ScrapeSource {
    http: reqwest::Client,
    base: Url,
}

impl ScrapeSource {
    pub fn new(http: reqwest::Client, site: &str) -> Result<Self> {
        let base = Url::parse(&format!("https://{site}/"))
            .map_err(|e| Error::Config(format!("invalid BLOG_SITE {site:?}: {e}")))?;
        Ok(Self { http, base })
    }
}

#[async_trait]
impl PostSource for ScrapeSource {
    fn name(&self) -> &'static str {
        "scrape"
    }

    fn excerpt_format(&self) -> ExcerptFormat {
        ExcerptFormat::Plain
    }

    async fn try_fetch(&self, keyword: &str) -> Result<Vec<PostRecord>> {
        let req = self.http.get(self.base.clone()).query(&[("s", keyword)]);
        let html = send_ok(req)
            .await?
            .text()
            .await
            .map_err(|e| Error::SourceUnreachable(format!("failed to read body: {e}")))?;

        Ok(parse_search_page(&html, &self.base))
    }
}

/// Extract one record per article heading that carries a link.
///
/// Headings without an `<a href>` are skipped. The image lookup is a
/// heuristic (container, then previous sibling, then the nearest earlier
/// image anywhere in the page) and can pick up an unrelated image when the
/// page layout differs from what it expects.
pub fn parse_search_page(html: &str, base: &Url) -> Vec<PostRecord> {
    let document = Html::parse_document(html);

    let headings = selector(HEADING_SELECTOR);
    let mut matched: Vec<ElementRef> = document.select(&headings).collect();
    if matched.is_empty() {
        matched = document.select(&selector(FALLBACK_HEADING_SELECTOR)).collect();
    }

    let link = selector("a[href]");
    let mut posts = Vec::new();
    for heading in matched {
        let Some(anchor) = heading.select(&link).next() else {
            continue;
        };
        let href = anchor.value().attr("href").unwrap_or_default();

        let title = squash_whitespace(&anchor.text().collect::<String>());
        let excerpt = find_excerpt(heading);
        let image = find_image(&document, heading).map(|src| resolve(base, &src));

        posts.push(
            PostRecord::new(Some(title), Some(resolve(base, href)), excerpt).with_image(image),
        );
        if posts.len() == MAX_RESULTS {
            break;
        }
    }
    posts
}

fn find_excerpt(heading: ElementRef) -> Option<String> {
    let para = selector("p");
    for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
        if is_heading(&sibling) {
            break;
        }
        let found = if sibling.value().name() == "p" {
            Some(sibling)
        } else {
            sibling.select(&para).next()
        };
        if let Some(p) = found {
            return Some(squash_whitespace(&p.text().collect::<String>()));
        }
    }
    None
}

fn find_image(document: &Html, heading: ElementRef) -> Option<String> {
    let img = selector("img");

    // 1. Same container.
    if let Some(container) = heading.parent().and_then(ElementRef::wrap) {
        if let Some(src) = container.select(&img).find_map(image_src) {
            return Some(src);
        }
    }

    // 2. A previous sibling image.
    if let Some(src) = heading
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "img")
        .find_map(image_src)
    {
        return Some(src);
    }

    // 3. Nearest image anywhere before the heading.
    let mut nearest = None;
    for node in document.tree.root().descendants() {
        if node.id() == heading.id() {
            break;
        }
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().name() == "img" {
                if let Some(src) = image_src(el) {
                    nearest = Some(src);
                }
            }
        }
    }
    nearest
}

fn image_src(img: ElementRef) -> Option<String> {
    let v = img.value();
    v.attr("src")
        .or_else(|| v.attr("data-src"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn is_heading(el: &ElementRef) -> bool {
    matches!(el.value().name(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn resolve(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid css selector")
}
