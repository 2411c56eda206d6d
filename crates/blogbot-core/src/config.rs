use std::{env, fs, path::Path, str::FromStr, time::Duration};

use crate::{errors::Error, Result};

pub const DEFAULT_BLOG_SITE: &str = "danienlared.wordpress.com";

/// Which upstream the bot searches. Exactly one is active per deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// WordPress.com public REST search API.
    Api,
    /// The blog's HTML search results page.
    Scrape,
    /// The keyword-scoped RSS/Atom feed.
    Feed,
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "api" | "rest" => Ok(Self::Api),
            "scrape" | "html" => Ok(Self::Scrape),
            "feed" | "rss" => Ok(Self::Feed),
            other => Err(Error::Config(format!(
                "BLOG_SOURCE must be one of api, scrape, feed (got {other:?})"
            ))),
        }
    }
}

/// Typed configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,
    pub application_id: Option<String>,

    // Blog source
    pub blog_site: String,
    pub source: SourceKind,
    pub default_image: Option<String>,

    // Publish-to-channel variant
    pub publish_channel_id: Option<i64>,

    // Runtime constants
    pub pager_timeout: Duration,
    pub http_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process env in `load`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }
        let application_id = lookup("BOT_APPLICATION_ID").and_then(non_empty);

        let blog_site = lookup("BLOG_SITE")
            .and_then(non_empty)
            .map(|s| normalize_site(&s))
            .unwrap_or_else(|| DEFAULT_BLOG_SITE.to_string());
        let source = match lookup("BLOG_SOURCE").and_then(non_empty) {
            Some(v) => v.parse()?,
            None => SourceKind::Api,
        };
        let default_image = lookup("BLOG_DEFAULT_IMAGE").and_then(non_empty);

        let publish_channel_id = match lookup("PUBLISH_CHANNEL_ID").and_then(non_empty) {
            Some(v) => Some(v.trim().parse::<i64>().map_err(|_| {
                Error::Config(format!("PUBLISH_CHANNEL_ID must be a numeric chat id (got {v:?})"))
            })?),
            None => None,
        };

        let pager_timeout = Duration::from_secs(
            parse_u64(lookup("PAGER_TIMEOUT_SECS")).unwrap_or(60).max(1),
        );
        let http_timeout =
            Duration::from_secs(parse_u64(lookup("HTTP_TIMEOUT_SECS")).unwrap_or(15).max(1));

        Ok(Self {
            telegram_bot_token,
            application_id,
            blog_site,
            source,
            default_image,
            publish_channel_id,
            pager_timeout,
            http_timeout,
        })
    }

    /// Footer text attached to every card.
    pub fn source_label(&self) -> String {
        format!("Source: {}", self.blog_site)
    }
}

/// Accept `https://blog.example/` as well as `blog.example`.
fn normalize_site(raw: &str) -> String {
    let s = raw.trim();
    let s = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
        .unwrap_or(s);
    s.trim_end_matches('/').to_string()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn parse_u64(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn token_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn defaults_apply() {
        let cfg = Config::from_lookup(lookup(&[("TELEGRAM_BOT_TOKEN", "t")])).unwrap();
        assert_eq!(cfg.blog_site, DEFAULT_BLOG_SITE);
        assert_eq!(cfg.source, SourceKind::Api);
        assert_eq!(cfg.pager_timeout, Duration::from_secs(60));
        assert_eq!(cfg.http_timeout, Duration::from_secs(15));
        assert!(cfg.publish_channel_id.is_none());
        assert!(cfg.default_image.is_none());
        assert_eq!(cfg.source_label(), "Source: danienlared.wordpress.com");
    }

    #[test]
    fn parses_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("BLOG_SITE", "https://example.blog/"),
            ("BLOG_SOURCE", "RSS"),
            ("PUBLISH_CHANNEL_ID", "-100123"),
            ("PAGER_TIMEOUT_SECS", "120"),
        ]))
        .unwrap();
        assert_eq!(cfg.blog_site, "example.blog");
        assert_eq!(cfg.source, SourceKind::Feed);
        assert_eq!(cfg.publish_channel_id, Some(-100123));
        assert_eq!(cfg.pager_timeout, Duration::from_secs(120));
    }

    #[test]
    fn rejects_unknown_source_and_bad_channel() {
        assert!(Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("BLOG_SOURCE", "carrier-pigeon"),
        ]))
        .is_err());
        assert!(Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("PUBLISH_CHANNEL_ID", "general"),
        ]))
        .is_err());
    }
}
