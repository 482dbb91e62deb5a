pub mod message;

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;

use crate::bot::AppContext;

pub struct BotHandler {
    ctx: Arc<AppContext>,
}

impl BotHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Commands are routed first; everything else that carries text is
    /// treated as a question for the vibe generator.
    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        let ctx_command = self.ctx.clone();
        let ctx_text = self.ctx.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<crate::bot::commands::Command>()
                    .endpoint(move |bot, msg, cmd| {
                        let ctx = ctx_command.clone();
                        async move {
                            message::command_handler(bot, msg, cmd, ctx)
                                .await
                                .map_err(Into::into)
                        }
                    }),
            )
            .branch(Update::filter_message().endpoint(move |bot, msg| {
                let ctx = ctx_text.clone();
                async move { message::text_handler(bot, msg, ctx).await.map_err(Into::into) }
            }))
    }
}
