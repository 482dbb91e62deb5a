use teloxide::prelude::*;

use crate::bot::{AppContext, GENERIC_APOLOGY, SET_SIGN_FIRST};
use crate::database::models::UserRecord;

pub async fn handle_vibe(bot: Bot, msg: Message, ctx: &AppContext) -> ResponseResult<()> {
    let Some(user_id) = ctx.remember_user(&msg).await else {
        return Ok(());
    };

    let sign = match UserRecord::sign_of(&ctx.db.pool, user_id).await {
        Ok(Some(sign)) => sign,
        Ok(None) => {
            bot.send_message(msg.chat.id, SET_SIGN_FIRST).await?;
            return Ok(());
        }
        Err(e) => {
            tracing::error!("Failed to look up sign for user {}: {}", user_id, e);
            bot.send_message(msg.chat.id, GENERIC_APOLOGY).await?;
            return Ok(());
        }
    };

    match ctx.vibes.vibe_for(sign).await {
        Ok(vibe) => {
            bot.send_message(
                msg.chat.id,
                format!("Вайб дня для {}:\n{}", sign.display(), vibe),
            )
            .await?;
        }
        Err(e) => {
            tracing::error!("Failed to produce vibe for user {}: {:#}", user_id, e);
            bot.send_message(msg.chat.id, GENERIC_APOLOGY).await?;
        }
    }
    Ok(())
}
