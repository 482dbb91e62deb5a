use teloxide::prelude::*;

use crate::bot::AppContext;
use crate::database::models::UserRecord;
use crate::signs::ZodiacSign;

pub const USAGE_TEXT: &str = "Використання: /set_sign Лев (або /set_sign Leo).";

pub async fn handle_set_sign(
    bot: Bot,
    msg: Message,
    raw_sign: String,
    ctx: &AppContext,
) -> ResponseResult<()> {
    let Some(user_id) = ctx.remember_user(&msg).await else {
        return Ok(());
    };

    if raw_sign.trim().is_empty() {
        bot.send_message(msg.chat.id, USAGE_TEXT).await?;
        return Ok(());
    }

    let book = ctx.vibes.sign_book();
    let sign = ZodiacSign::parse(&raw_sign).filter(|sign| book.profile(*sign).is_some());

    let Some(sign) = sign else {
        tracing::debug!("User {} sent unknown sign '{}'", user_id, raw_sign.trim());
        bot.send_message(
            msg.chat.id,
            format!("Невідомий знак. Обери один із: {}.", book.valid_names()),
        )
        .await?;
        return Ok(());
    };

    if let Err(e) = UserRecord::set_sign(&ctx.db.pool, user_id, sign).await {
        tracing::error!("Failed to store sign for user {}: {}", user_id, e);
        bot.send_message(msg.chat.id, crate::bot::GENERIC_APOLOGY).await?;
        return Ok(());
    }

    tracing::info!("User {} set sign {}", user_id, sign.name_en());
    bot.send_message(msg.chat.id, format!("Знак збережено: {}.", sign.name_ua()))
        .await?;
    Ok(())
}
