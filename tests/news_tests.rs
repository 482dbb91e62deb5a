#![allow(clippy::unwrap_used)]

use astro_vibe_bot::services::news::{
    channel_username, parse_rss_items, render_snippet, NewsFetcher, NewsItem, NewsOrigin,
    NewsSource, NoNewsSource, EMPTY_FEED_TEXT, NO_SOURCE_TEXT,
};

const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Новини</title>
    <link>https://example.com</link>
    <description>Стрічка</description>
    <item>
      <title>Перша  новина</title>
      <description>Короткий
опис</description>
    </item>
    <item>
      <title>Друга новина</title>
    </item>
    <item>
      <description>Лише опис</description>
    </item>
    <item>
      <title>Зайва новина</title>
    </item>
  </channel>
</rss>"#;

#[test]
fn test_parse_rss_items_flattens_and_limits() {
    let items = parse_rss_items(SAMPLE_FEED.as_bytes(), 3).unwrap();
    assert_eq!(items.len(), 3);
    // Whitespace inside titles and descriptions is squashed
    assert_eq!(items[0].text, "Перша новина: Короткий опис");
    assert_eq!(items[1].text, "Друга новина");
    assert_eq!(items[2].text, "Лише опис");
}

#[test]
fn test_parse_rss_items_rejects_garbage() {
    assert!(parse_rss_items(b"not xml at all", 10).is_err());
}

#[test]
fn test_snippet_rendering_modes() {
    assert_eq!(render_snippet(NewsOrigin::None, &[]).text, NO_SOURCE_TEXT);
    assert_eq!(render_snippet(NewsOrigin::Rss, &[]).text, EMPTY_FEED_TEXT);

    let items = parse_rss_items(SAMPLE_FEED.as_bytes(), 2).unwrap();
    let snippet = render_snippet(NewsOrigin::Rss, &items);
    assert!(snippet.text.starts_with("- Перша новина"));
    assert_eq!(snippet.text.lines().count(), 2);
}

struct StaticSource {
    origin: NewsOrigin,
    items: Vec<NewsItem>,
    fail: bool,
}

#[async_trait::async_trait]
impl NewsSource for StaticSource {
    fn origin(&self) -> NewsOrigin {
        self.origin
    }

    async fn fetch(&self) -> anyhow::Result<Vec<NewsItem>> {
        if self.fail {
            anyhow::bail!("source unavailable");
        }
        Ok(self.items.clone())
    }
}

fn item(text: &str) -> NewsItem {
    NewsItem { text: text.to_string() }
}

#[tokio::test]
async fn test_fetcher_prefers_primary() {
    let fetcher = NewsFetcher::new(
        Box::new(StaticSource {
            origin: NewsOrigin::TelegramChannel,
            items: vec![item("з каналу")],
            fail: false,
        }),
        Some(Box::new(StaticSource {
            origin: NewsOrigin::Rss,
            items: vec![item("з RSS")],
            fail: false,
        })),
    );

    let snippet = fetcher.snippet().await;
    assert_eq!(snippet.source, NewsOrigin::TelegramChannel);
    assert_eq!(snippet.text, "- з каналу");
}

#[tokio::test]
async fn test_fetcher_falls_back_on_failure() {
    let fetcher = NewsFetcher::new(
        Box::new(StaticSource {
            origin: NewsOrigin::TelegramChannel,
            items: vec![],
            fail: true,
        }),
        Some(Box::new(StaticSource {
            origin: NewsOrigin::Rss,
            items: vec![item("з RSS")],
            fail: false,
        })),
    );

    let snippet = fetcher.snippet().await;
    assert_eq!(snippet.source, NewsOrigin::Rss);
    assert_eq!(snippet.text, "- з RSS");
}

#[tokio::test]
async fn test_fetcher_falls_back_on_empty_primary() {
    let fetcher = NewsFetcher::new(
        Box::new(StaticSource {
            origin: NewsOrigin::TelegramChannel,
            items: vec![],
            fail: false,
        }),
        Some(Box::new(StaticSource {
            origin: NewsOrigin::Rss,
            items: vec![item("з RSS")],
            fail: false,
        })),
    );

    let snippet = fetcher.snippet().await;
    assert_eq!(snippet.source, NewsOrigin::Rss);
}

#[tokio::test]
async fn test_fetcher_degrades_to_empty_snippet() {
    let fetcher = NewsFetcher::new(
        Box::new(StaticSource {
            origin: NewsOrigin::Rss,
            items: vec![],
            fail: true,
        }),
        None,
    );

    let snippet = fetcher.snippet().await;
    assert_eq!(snippet.source, NewsOrigin::Rss);
    assert_eq!(snippet.text, EMPTY_FEED_TEXT);
}

#[tokio::test]
async fn test_no_news_source_renders_placeholder() {
    let fetcher = NewsFetcher::new(Box::new(NoNewsSource), None);
    let snippet = fetcher.snippet().await;
    assert_eq!(snippet.source, NewsOrigin::None);
    assert_eq!(snippet.text, NO_SOURCE_TEXT);
}

#[test]
fn test_channel_username_normalization() {
    assert_eq!(channel_username("@vibes_news"), "vibes_news");
    assert_eq!(channel_username("https://t.me/vibes_news"), "vibes_news");
    assert_eq!(channel_username("vibes_news"), "vibes_news");
}
