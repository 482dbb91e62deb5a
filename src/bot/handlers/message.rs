use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::{broadcast, sign, vibe, Command};
use crate::bot::{AppContext, GENERIC_APOLOGY, SET_SIGN_FIRST};
use crate::database::models::UserRecord;

const WELCOME_TEXT: &str = "Ласкаво просимо до Astro Vibe Bot! Вкажи знак зодіаку командою \
    /set_sign <знак>, щоб отримувати вайб дня та персональні прогнози. Будь-яке інше \
    повідомлення я сприйму як питання.";

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: Arc<AppContext>,
) -> ResponseResult<()> {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Start => {
            let _ = ctx.remember_user(&msg).await;
            bot.send_message(msg.chat.id, WELCOME_TEXT).await?;
        }
        Command::SetSign { sign } => {
            sign::handle_set_sign(bot, msg, sign, &ctx).await?;
        }
        Command::Vibe => {
            vibe::handle_vibe(bot, msg, &ctx).await?;
        }
        Command::BroadcastNow => {
            broadcast::handle_broadcast_now(bot, msg, &ctx).await?;
        }
    }
    Ok(())
}

/// Non-command messages: malformed commands get a hint, plain text becomes a
/// question for the vibe generator.
pub async fn text_handler(bot: Bot, msg: Message, ctx: Arc<AppContext>) -> ResponseResult<()> {
    let Some(text) = msg.text().map(str::to_owned) else {
        return Ok(());
    };

    if let Some(stripped) = text.strip_prefix('/') {
        if stripped.trim_end() == "set_sign" {
            bot.send_message(msg.chat.id, sign::USAGE_TEXT).await?;
        } else {
            let command = text.split_whitespace().next().unwrap_or(&text).to_string();
            bot.send_message(
                msg.chat.id,
                format!("Невідома команда {}. Спробуй /help.", command),
            )
            .await?;
        }
        return Ok(());
    }

    handle_question(bot, msg, &text, &ctx).await
}

/// Free-text question: requires a set sign, otherwise no model call is made.
async fn handle_question(
    bot: Bot,
    msg: Message,
    question: &str,
    ctx: &AppContext,
) -> ResponseResult<()> {
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

    match ctx.vibes.answer_question(sign, question).await {
        Ok(answer) => {
            bot.send_message(msg.chat.id, answer).await?;
        }
        Err(e) => {
            tracing::error!("Failed to answer question for user {}: {:#}", user_id, e);
            bot.send_message(msg.chat.id, GENERIC_APOLOGY).await?;
        }
    }
    Ok(())
}
