//! Daily vibe broadcast.
//!
//! One timezone-aware cron job per process. On fire it loads or generates
//! today's context once, DMs every registered user, then posts one channel
//! message per configured sign. Every send is independent: a failure is
//! logged and the loop moves on.

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::database::models::UserRecord;
use crate::services::vibe::{DailyVibes, VibeService};
use crate::signs::SignBook;

const SET_SIGN_REMINDER: &str =
    "Вкажи свій знак зодіаку: /set_sign <знак>, щоб отримувати вайб дня.";

pub struct BroadcastService {
    bot: Bot,
    vibes: Arc<VibeService>,
    db: Arc<DatabaseManager>,
    channel: Option<Recipient>,
    timezone: chrono_tz::Tz,
    hour: u32,
    minute: u32,
    scheduler: JobScheduler,
}

impl BroadcastService {
    pub async fn new(
        bot: Bot,
        vibes: Arc<VibeService>,
        db: Arc<DatabaseManager>,
        config: &Config,
    ) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            bot,
            vibes,
            db,
            channel: config.broadcast_channel.as_deref().map(parse_recipient),
            timezone: config.timezone,
            hour: config.broadcast_hour,
            minute: config.broadcast_minute,
            scheduler,
        })
    }

    pub async fn start(&mut self) -> Result<()> {
        let cron = format!("0 {} {} * * *", self.minute, self.hour);
        let bot = self.bot.clone();
        let vibes = self.vibes.clone();
        let db = self.db.clone();
        let channel = self.channel.clone();

        let broadcast_job = Job::new_async_tz(cron.as_str(), self.timezone, move |_uuid, _l| {
            let bot = bot.clone();
            let vibes = vibes.clone();
            let db = db.clone();
            let channel = channel.clone();
            Box::pin(async move {
                if let Err(e) = run_broadcast(&bot, &vibes, &db, channel.as_ref()).await {
                    error!("Daily broadcast failed: {:#}", e);
                }
            })
        })?;

        self.scheduler.add(broadcast_job).await?;
        self.scheduler.start().await?;

        info!(
            "Daily broadcast scheduled at {:02}:{:02} {}",
            self.hour, self.minute, self.timezone
        );
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        Ok(())
    }
}

/// Full broadcast pass: user DMs first, then the channel.
async fn run_broadcast(
    bot: &Bot,
    vibes: &VibeService,
    db: &DatabaseManager,
    channel: Option<&Recipient>,
) -> Result<()> {
    // One generation per day, shared by DMs and the channel.
    let context = vibes.daily_vibes().await?;

    let users = UserRecord::all(&db.pool).await?;
    for user in users {
        let text = match user.zodiac_sign() {
            Some(sign) => {
                let mut message =
                    format!("Вайб дня для {}:\n{}", sign.display(), context.vibe_for(sign));
                if !context.global_summary.is_empty() {
                    message.push_str(&format!(
                        "\n\nГлобальний контекст: {}",
                        context.global_summary
                    ));
                }
                message
            }
            None => SET_SIGN_REMINDER.to_string(),
        };

        if let Err(e) = bot.send_message(ChatId(user.chat_id), text).await {
            error!("Failed to DM daily vibe to chat {}: {}", user.chat_id, e);
        }
    }

    if let Some(channel) = channel {
        send_channel_broadcast(bot, &context, vibes.sign_book(), channel).await;
    }

    Ok(())
}

/// Sends one message per configured sign to the channel. Returns how many
/// sends succeeded; failures are logged and do not stop the loop.
pub async fn send_channel_broadcast(
    bot: &Bot,
    context: &DailyVibes,
    signs: &SignBook,
    channel: &Recipient,
) -> usize {
    let mut sent = 0;
    for message in build_channel_messages(context, signs) {
        match bot.send_message(channel.clone(), message).await {
            Ok(_) => sent += 1,
            Err(e) => {
                error!("Failed to send channel broadcast message: {}", e);
            }
        }
    }
    sent
}

/// One message per configured sign, in zodiac order. The first message is
/// prefixed with the affirmation and the global summary.
pub fn build_channel_messages(context: &DailyVibes, signs: &SignBook) -> Vec<String> {
    let mut messages = Vec::new();
    let mut first = true;

    for sign in signs.signs() {
        let mut lines: Vec<String> = Vec::new();
        if first {
            if !context.affirmation.is_empty() {
                lines.push(context.affirmation.clone());
            }
            if !context.global_summary.is_empty() {
                lines.push(context.global_summary.clone());
            }
            if !lines.is_empty() {
                lines.push(String::new());
            }
            first = false;
        }
        lines.push(format!("{}: {}", sign.display(), context.vibe_for(sign)));
        messages.push(lines.join("\n").trim().to_string());
    }

    messages
}

/// Broadcast channels may be configured as a numeric chat id or a username.
pub fn parse_recipient(raw: &str) -> Recipient {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Recipient::Id(ChatId(id));
    }
    if let Some(stripped) = raw.strip_prefix('@') {
        return Recipient::ChannelUsername(format!("@{}", stripped));
    }
    Recipient::ChannelUsername(format!("@{}", raw))
}
