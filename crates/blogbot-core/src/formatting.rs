//! Formatting utilities (excerpt cleanup, truncation, Telegram HTML).

use std::sync::OnceLock;

use regex::Regex;

/// Maximum excerpt length (in characters) shown on a card.
pub const EXCERPT_LIMIT: usize = 300;
pub const ELLIPSIS: &str = "…";

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Strip the paragraph wrappers and map bold wrappers to `**` in an API excerpt.
///
/// Only this fixed set of tokens is touched; anything else passes through.
pub fn clean_excerpt_markup(excerpt: &str) -> String {
    excerpt
        .replace("<p>", "")
        .replace("</p>", "")
        .replace("<strong>", "**")
        .replace("</strong>", "**")
        .trim()
        .to_string()
}

/// Cap `text` at [`EXCERPT_LIMIT`] characters, appending [`ELLIPSIS`] when cut.
pub fn truncate_excerpt(text: &str) -> String {
    truncate_chars(text, EXCERPT_LIMIT)
}

/// Keep the first `limit` chars (not bytes) and append the ellipsis if anything was dropped.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Escape `text` and turn `**bold**` spans into `<b>bold</b>`.
pub fn bold_markdown_to_html(text: &str) -> String {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    let re = BOLD.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
    re.replace_all(&escape_html(text), "<b>$1</b>").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_api_markup() {
        assert_eq!(clean_excerpt_markup("<p><strong>Hi</strong></p>"), "**Hi**");
        assert_eq!(
            clean_excerpt_markup("  <p>plain <em>kept</em></p>\n"),
            "plain <em>kept</em>"
        );
    }

    #[test]
    fn truncation_boundary() {
        let exact = "a".repeat(EXCERPT_LIMIT);
        assert_eq!(truncate_excerpt(&exact), exact);

        let long = "b".repeat(EXCERPT_LIMIT + 1);
        let out = truncate_excerpt(&long);
        assert_eq!(out, format!("{}{ELLIPSIS}", "b".repeat(EXCERPT_LIMIT)));
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let text = "ñ".repeat(EXCERPT_LIMIT + 5);
        let out = truncate_excerpt(&text);
        assert_eq!(out.chars().count(), EXCERPT_LIMIT + 1);
        assert!(out.ends_with(ELLIPSIS));
    }

    #[test]
    fn bold_to_html_escapes_first() {
        assert_eq!(bold_markdown_to_html("**Hi** <x>"), "<b>Hi</b> &lt;x&gt;");
        assert_eq!(bold_markdown_to_html("a ** b"), "a ** b");
    }
}
