/// Bot commands and their handlers
pub mod commands;
/// Dispatcher schema and message routing
pub mod handlers;

use std::sync::Arc;

use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::services::vibe::VibeService;

/// Apology sent when an external API call fails; nothing is retried.
pub const GENERIC_APOLOGY: &str =
    "Вибач, зараз не вдалося згенерувати відповідь. Спробуй пізніше.";

/// Reply for vibe/question requests made before a sign is set.
pub const SET_SIGN_FIRST: &str = "Спочатку вкажи знак: /set_sign <знак>.";

/// Shared state injected into every handler. No module-level singletons:
/// everything a handler needs travels through this struct.
pub struct AppContext {
    pub db: Arc<DatabaseManager>,
    pub vibes: Arc<VibeService>,
    pub config: Arc<Config>,
}

impl AppContext {
    /// Upserts the sender so broadcasts can reach them later. Returns the
    /// sender's user id; messages without a sender are skipped.
    pub async fn remember_user(&self, msg: &teloxide::types::Message) -> Option<i64> {
        let user = msg.from()?;
        let user_id = user.id.0 as i64;
        if let Err(e) = crate::database::models::UserRecord::upsert(
            &self.db.pool,
            user_id,
            msg.chat.id.0,
            user.username.as_deref(),
        )
        .await
        {
            tracing::error!("Failed to upsert user {}: {}", user_id, e);
        }
        Some(user_id)
    }
}
