use anyhow::{anyhow, Result};
use std::collections::HashSet;
use std::env;

/// Settings for reading news from a Telegram channel through a
/// personal-account client. Only built when api id, api hash and the channel
/// are all configured.
#[derive(Debug, Clone)]
pub struct ChannelNewsConfig {
    pub api_id: i32,
    pub api_hash: String,
    pub channel: String,
    pub limit: usize,
    pub session_file: String,
    /// Base64-encoded session blob, takes precedence over the session file.
    pub session_string: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub database_url: String,
    pub signs_path: String,
    pub rss_feed_url: Option<String>,
    pub timezone: chrono_tz::Tz,
    pub broadcast_channel: Option<String>,
    pub broadcast_hour: u32,
    pub broadcast_minute: u32,
    pub admin_user_ids: HashSet<i64>,
    pub channel_news: Option<ChannelNewsConfig>,
    pub http_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let telegram_bot_token = required("TELEGRAM_BOT_TOKEN")?;
        let openai_api_key = required("OPENAI_API_KEY")?;

        let openai_model = optional("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
        let database_url =
            optional("DATABASE_URL").unwrap_or_else(|| "sqlite:./data/astro.db".to_string());
        let signs_path = optional("SIGNS_PATH").unwrap_or_else(|| "config/signs.yaml".to_string());
        let rss_feed_url = optional("RSS_FEED_URL");
        let broadcast_channel = optional("BROADCAST_CHANNEL");

        let timezone_name = optional("TIMEZONE").unwrap_or_else(|| "UTC".to_string());
        let timezone: chrono_tz::Tz = timezone_name
            .parse()
            .map_err(|_| anyhow!("Invalid TIMEZONE '{}'", timezone_name))?;

        let broadcast_time = optional("BROADCAST_TIME").unwrap_or_else(|| "09:00".to_string());
        let (broadcast_hour, broadcast_minute) = parse_broadcast_time(&broadcast_time)?;

        let admin_user_ids = parse_admin_ids(optional("ADMIN_USER_IDS").as_deref());

        let http_port = optional("HTTP_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let channel_news = channel_news_from_env()?;

        Ok(Config {
            telegram_bot_token,
            openai_api_key,
            openai_model,
            database_url,
            signs_path,
            rss_feed_url,
            timezone,
            broadcast_channel,
            broadcast_hour,
            broadcast_minute,
            admin_user_ids,
            channel_news,
            http_port,
        })
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        // Empty admin list means the command is open, as in the original bot.
        self.admin_user_ids.is_empty() || self.admin_user_ids.contains(&user_id)
    }
}

fn required(name: &str) -> Result<String> {
    let value = env::var(name).map_err(|_| anyhow!("{} must be set", name))?;
    if value.trim().is_empty() {
        return Err(anyhow!("{} must be set", name));
    }
    Ok(value)
}

fn optional(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn channel_news_from_env() -> Result<Option<ChannelNewsConfig>> {
    let (Some(api_id), Some(api_hash), Some(channel)) = (
        optional("TELEGRAM_API_ID"),
        optional("TELEGRAM_API_HASH"),
        optional("TELEGRAM_NEWS_CHANNEL"),
    ) else {
        return Ok(None);
    };

    let api_id = api_id
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid TELEGRAM_API_ID"))?;
    let limit = optional("TELEGRAM_NEWS_LIMIT")
        .unwrap_or_else(|| "20".to_string())
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid TELEGRAM_NEWS_LIMIT"))?;
    let session_file =
        optional("TELEGRAM_SESSION_FILE").unwrap_or_else(|| "grammers.session".to_string());
    let session_string = optional("TELEGRAM_SESSION");

    Ok(Some(ChannelNewsConfig {
        api_id,
        api_hash,
        channel,
        limit,
        session_file,
        session_string,
    }))
}

/// Parses a comma or whitespace separated list of Telegram user ids,
/// silently skipping tokens that are not numeric.
pub fn parse_admin_ids(raw: Option<&str>) -> HashSet<i64> {
    let Some(raw) = raw else {
        return HashSet::new();
    };
    raw.replace(',', " ")
        .split_whitespace()
        .filter_map(|token| token.parse().ok())
        .collect()
}

/// Parses "HH:MM" into an (hour, minute) pair.
pub fn parse_broadcast_time(raw: &str) -> Result<(u32, u32)> {
    let mut parts = raw.trim().splitn(2, ':');
    let hour: u32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(|| anyhow!("Invalid BROADCAST_TIME '{}'", raw))?;
    let minute: u32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(|| anyhow!("Invalid BROADCAST_TIME '{}'", raw))?;
    if hour > 23 || minute > 59 {
        return Err(anyhow!("Invalid BROADCAST_TIME '{}'", raw));
    }
    Ok((hour, minute))
}
