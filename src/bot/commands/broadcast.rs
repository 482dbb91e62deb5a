use teloxide::prelude::*;

use crate::bot::{AppContext, GENERIC_APOLOGY};
use crate::services::broadcast::{parse_recipient, send_channel_broadcast};

/// Manual trigger of the channel broadcast, restricted to configured admins.
pub async fn handle_broadcast_now(bot: Bot, msg: Message, ctx: &AppContext) -> ResponseResult<()> {
    let Some(user_id) = ctx.remember_user(&msg).await else {
        return Ok(());
    };

    if !ctx.config.is_admin(user_id) {
        bot.send_message(msg.chat.id, "Недостатньо прав для цієї команди.")
            .await?;
        return Ok(());
    }

    let Some(channel) = ctx.config.broadcast_channel.as_deref() else {
        bot.send_message(msg.chat.id, "BROADCAST_CHANNEL не налаштовано.")
            .await?;
        return Ok(());
    };

    let context = match ctx.vibes.daily_vibes().await {
        Ok(context) => context,
        Err(e) => {
            tracing::error!("Manual broadcast failed to build context: {:#}", e);
            bot.send_message(msg.chat.id, GENERIC_APOLOGY).await?;
            return Ok(());
        }
    };

    let recipient = parse_recipient(channel);
    let sent = send_channel_broadcast(&bot, &context, ctx.vibes.sign_book(), &recipient).await;
    tracing::info!("Manual broadcast by user {} sent {} messages", user_id, sent);
    bot.send_message(msg.chat.id, "Надіслано в канал.").await?;
    Ok(())
}
