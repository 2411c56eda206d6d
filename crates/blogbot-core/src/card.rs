//! Presenter: turn a [`PostRecord`] into a [`DisplayCard`].

use chrono::{DateTime, Utc};

use crate::{
    fetch::ExcerptFormat,
    formatting::{bold_markdown_to_html, clean_excerpt_markup, escape_html, truncate_excerpt},
    model::PostRecord,
};

/// Discord-style "blurple", kept as the card accent.
pub const ACCENT_BLURPLE: u32 = 0x5865F2;

/// Rendering options shared by every card of one deployment.
#[derive(Clone, Debug)]
pub struct CardStyle {
    pub excerpt_format: ExcerptFormat,
    pub footer: String,
}

/// User-facing rendering of one post. Never mutated after [`render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayCard {
    pub title: String,
    pub url: String,
    pub accent: u32,
    pub description: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub footer: String,
}

/// Pure mapping from record to card.
///
/// HTML excerpts (API source) lose their paragraph wrappers and get `**`
/// for bold before truncation; other sources pass through as-is.
pub fn render(record: &PostRecord, style: &CardStyle) -> DisplayCard {
    let excerpt = match style.excerpt_format {
        ExcerptFormat::Html => clean_excerpt_markup(&record.excerpt),
        ExcerptFormat::Plain => record.excerpt.clone(),
    };

    DisplayCard {
        title: record.title.clone(),
        url: record.url.clone(),
        accent: ACCENT_BLURPLE,
        description: truncate_excerpt(&excerpt),
        author: record.author.clone(),
        image_url: record.image_url.clone(),
        published: record.published,
        footer: style.footer.clone(),
    }
}

impl DisplayCard {
    /// Telegram HTML for this card, with a `position/total` marker in the footer.
    ///
    /// The image (if any) goes first as an invisible link so the client's link
    /// preview shows it.
    pub fn to_html(&self, position: usize, total: usize) -> String {
        let mut out = String::new();

        if let Some(img) = &self.image_url {
            out.push_str(&format!("<a href=\"{}\">\u{200B}</a>", escape_html(img)));
        }

        let title = escape_html(&self.title);
        if self.url.is_empty() {
            out.push_str(&format!("<b>{title}</b>"));
        } else {
            out.push_str(&format!(
                "<b><a href=\"{}\">{title}</a></b>",
                escape_html(&self.url)
            ));
        }

        if let Some(author) = &self.author {
            out.push_str(&format!("\n✍️ {}", escape_html(author)));
        }

        if !self.description.is_empty() {
            out.push_str("\n\n");
            out.push_str(&bold_markdown_to_html(&self.description));
        }

        let mut footer = escape_html(&self.footer);
        if let Some(date) = self.published {
            footer.push_str(&format!(" · {}", date.format("%Y-%m-%d")));
        }
        if total > 1 {
            footer.push_str(&format!(" · {position}/{total}"));
        }
        out.push_str(&format!("\n\n<i>{footer}</i>"));

        out
    }
}
