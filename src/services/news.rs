//! News fetching for prompt enrichment.
//!
//! Two interchangeable strategies behind one [`NewsSource`] trait: an RSS
//! feed and a Telegram channel read through a signed-in personal-account
//! client. Selection happens once at startup; at fetch time a failed or
//! empty primary degrades to the fallback source. Every fetch is fresh, no
//! caching or deduplication across calls.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use grammers_session::Session;
use tracing::{debug, info, warn};

use crate::config::{ChannelNewsConfig, Config};
use crate::utils::text::{squash_whitespace, truncate_chars};

/// Snippet text when no news source is configured at all.
pub const NO_SOURCE_TEXT: &str = "Немає налаштованого джерела новин.";
/// Snippet text when a source is configured but returned nothing.
pub const EMPTY_FEED_TEXT: &str = "Важливих новин немає.";

const RSS_ITEM_LIMIT: usize = 10;
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_ITEM_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsOrigin {
    Rss,
    TelegramChannel,
    None,
}

impl NewsOrigin {
    pub fn label(self) -> &'static str {
        match self {
            NewsOrigin::Rss => "rss",
            NewsOrigin::TelegramChannel => "telegram-channel",
            NewsOrigin::None => "none",
        }
    }
}

/// One fetched headline or message, already flattened to a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub text: String,
}

/// The rendered news context handed to prompt building. Ephemeral, never
/// persisted.
#[derive(Debug, Clone)]
pub struct NewsSnippet {
    pub text: String,
    pub source: NewsOrigin,
    pub fetched_at: DateTime<Utc>,
}

/// Capability interface over the concrete news backends.
#[async_trait]
pub trait NewsSource: Send + Sync {
    fn origin(&self) -> NewsOrigin;
    async fn fetch(&self) -> Result<Vec<NewsItem>>;
}

/// Renders fetched items into the snippet shape shared by every source, so
/// downstream prompt building never branches on the origin.
pub fn render_snippet(origin: NewsOrigin, items: &[NewsItem]) -> NewsSnippet {
    let text = if origin == NewsOrigin::None {
        NO_SOURCE_TEXT.to_string()
    } else if items.is_empty() {
        EMPTY_FEED_TEXT.to_string()
    } else {
        items
            .iter()
            .map(|item| format!("- {}", item.text))
            .collect::<Vec<_>>()
            .join("\n")
    };

    NewsSnippet {
        text,
        source: origin,
        fetched_at: Utc::now(),
    }
}

/// Pulls the latest items from an RSS feed.
pub struct RssFeedSource {
    http: reqwest::Client,
    url: String,
}

impl RssFeedSource {
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl NewsSource for RssFeedSource {
    fn origin(&self) -> NewsOrigin {
        NewsOrigin::Rss
    }

    async fn fetch(&self) -> Result<Vec<NewsItem>> {
        debug!("Fetching RSS feed {}", self.url);
        let response = self
            .http
            .get(&self.url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("Failed to fetch RSS feed {}", self.url))?;
        let body = response.bytes().await.context("Failed to read RSS body")?;
        parse_rss_items(&body, RSS_ITEM_LIMIT)
    }
}

/// Parses an RSS document into flattened "title: summary" items.
pub fn parse_rss_items(body: &[u8], limit: usize) -> Result<Vec<NewsItem>> {
    let channel = rss::Channel::read_from(body).context("Failed to parse RSS feed")?;

    let items = channel
        .items()
        .iter()
        .take(limit)
        .filter_map(|item| {
            let title = item.title().map(squash_whitespace).unwrap_or_default();
            let summary = item.description().map(squash_whitespace).unwrap_or_default();
            let line = match (title.is_empty(), summary.is_empty()) {
                (true, true) => return None,
                (false, true) => title,
                (true, false) => summary,
                (false, false) => format!("{}: {}", title, summary),
            };
            Some(NewsItem {
                text: truncate_chars(&line, MAX_ITEM_CHARS),
            })
        })
        .collect();

    Ok(items)
}

/// Reads the most recent messages of a channel through a personal-account
/// MTProto client. Requires a previously persisted, authorized session.
pub struct ChannelNewsSource {
    client: grammers_client::Client,
    channel: String,
    limit: usize,
}

impl ChannelNewsSource {
    /// Connects and verifies authorization. Any failure here disables the
    /// channel source only; the caller degrades to RSS or no-news mode.
    pub async fn connect(config: &ChannelNewsConfig) -> Result<Self> {
        let session = load_session(config)?;

        let client = grammers_client::Client::connect(grammers_client::Config {
            session,
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
            params: Default::default(),
        })
        .await
        .context("Failed to connect personal-account client")?;

        if !client
            .is_authorized()
            .await
            .context("Failed to check session authorization")?
        {
            return Err(anyhow!(
                "Personal-account session is not authorized; sign in and persist the session first"
            ));
        }

        info!("Personal-account client connected for channel {}", config.channel);
        Ok(Self {
            client,
            channel: config.channel.clone(),
            limit: config.limit,
        })
    }
}

fn load_session(config: &ChannelNewsConfig) -> Result<Session> {
    if let Some(encoded) = &config.session_string {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .context("TELEGRAM_SESSION is not valid base64")?;
        return Session::load(&bytes).context("TELEGRAM_SESSION does not decode to a session");
    }
    Session::load_file_or_create(&config.session_file)
        .with_context(|| format!("Failed to load session file {}", config.session_file))
}

/// Strips `@` and t.me prefixes down to a bare channel username.
pub fn channel_username(raw: &str) -> &str {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix("https://t.me/")
        .or_else(|| raw.strip_prefix("t.me/"))
        .unwrap_or(raw);
    raw.strip_prefix('@').unwrap_or(raw)
}

#[async_trait]
impl NewsSource for ChannelNewsSource {
    fn origin(&self) -> NewsOrigin {
        NewsOrigin::TelegramChannel
    }

    async fn fetch(&self) -> Result<Vec<NewsItem>> {
        let username = channel_username(&self.channel);
        let chat = self
            .client
            .resolve_username(username)
            .await
            .with_context(|| format!("Failed to resolve channel {}", username))?
            .ok_or_else(|| anyhow!("Channel {} not found", username))?;

        let mut items = Vec::new();
        let mut messages = self.client.iter_messages(&chat).limit(self.limit);
        while let Some(message) = messages
            .next()
            .await
            .context("Failed to read channel history")?
        {
            let text = squash_whitespace(message.text());
            if text.is_empty() {
                continue;
            }
            items.push(NewsItem {
                text: truncate_chars(&text, MAX_ITEM_CHARS),
            });
        }

        debug!("Read {} messages from channel {}", items.len(), username);
        Ok(items)
    }
}

/// Placeholder source for deployments without any news configuration.
pub struct NoNewsSource;

#[async_trait]
impl NewsSource for NoNewsSource {
    fn origin(&self) -> NewsOrigin {
        NewsOrigin::None
    }

    async fn fetch(&self) -> Result<Vec<NewsItem>> {
        Ok(Vec::new())
    }
}

/// Primary source plus optional fallback, resolved once from configuration.
pub struct NewsFetcher {
    primary: Box<dyn NewsSource>,
    fallback: Option<Box<dyn NewsSource>>,
}

impl NewsFetcher {
    pub fn new(primary: Box<dyn NewsSource>, fallback: Option<Box<dyn NewsSource>>) -> Self {
        Self { primary, fallback }
    }

    /// Builds the fetcher for the current configuration. A channel source
    /// that cannot connect or is unauthorized only disables that feature.
    pub async fn from_config(config: &Config) -> Self {
        let rss: Option<Box<dyn NewsSource>> = config
            .rss_feed_url
            .as_deref()
            .map(|url| Box::new(RssFeedSource::new(url)) as Box<dyn NewsSource>);

        if let Some(channel_config) = &config.channel_news {
            match ChannelNewsSource::connect(channel_config).await {
                Ok(source) => return Self::new(Box::new(source), rss),
                Err(e) => {
                    warn!("Channel news source disabled: {:#}", e);
                }
            }
        }

        match rss {
            Some(source) => Self::new(source, None),
            None => {
                info!("No news source configured, vibes run without news context");
                Self::new(Box::new(NoNewsSource), None)
            }
        }
    }

    /// Fetches and renders the news snippet. Never fails: fetch errors are
    /// logged and degrade to the fallback source or to an empty snippet.
    pub async fn snippet(&self) -> NewsSnippet {
        match self.primary.fetch().await {
            Ok(items) if !items.is_empty() => return render_snippet(self.primary.origin(), &items),
            Ok(_) => {
                debug!("Primary news source {} returned nothing", self.primary.origin().label());
            }
            Err(e) => {
                warn!("Primary news source {} failed: {:#}", self.primary.origin().label(), e);
            }
        }

        if let Some(fallback) = &self.fallback {
            match fallback.fetch().await {
                Ok(items) => return render_snippet(fallback.origin(), &items),
                Err(e) => {
                    warn!("Fallback news source {} failed: {:#}", fallback.origin().label(), e);
                }
            }
        }

        render_snippet(self.primary.origin(), &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_snippet_no_source() {
        let snippet = render_snippet(NewsOrigin::None, &[]);
        assert_eq!(snippet.text, NO_SOURCE_TEXT);
        assert_eq!(snippet.source, NewsOrigin::None);
    }

    #[test]
    fn test_render_snippet_empty_feed() {
        let snippet = render_snippet(NewsOrigin::Rss, &[]);
        assert_eq!(snippet.text, EMPTY_FEED_TEXT);
    }

    #[test]
    fn test_render_snippet_bullets() {
        let items = vec![
            NewsItem { text: "first".to_string() },
            NewsItem { text: "second".to_string() },
        ];
        let snippet = render_snippet(NewsOrigin::TelegramChannel, &items);
        assert_eq!(snippet.text, "- first\n- second");
    }

    #[test]
    fn test_channel_username_variants() {
        assert_eq!(channel_username("@news"), "news");
        assert_eq!(channel_username("https://t.me/news"), "news");
        assert_eq!(channel_username("t.me/news"), "news");
        assert_eq!(channel_username("  news  "), "news");
    }
}
