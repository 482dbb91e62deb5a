use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::signs::ZodiacSign;

/// One row per Telegram user: where to reach them and which sign they chose.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: i64,
    pub chat_id: i64,
    pub username: Option<String>,
    pub sign: Option<String>,
    pub created_at: String,
}

impl UserRecord {
    /// The stored sign, if set and still a valid sign name.
    pub fn zodiac_sign(&self) -> Option<ZodiacSign> {
        self.sign.as_deref().and_then(ZodiacSign::from_name_en)
    }

    /// Inserts the user or refreshes chat id and username. The sign is left
    /// untouched on conflict.
    pub async fn upsert(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        chat_id: i64,
        username: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO users (user_id, chat_id, username, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                chat_id = excluded.chat_id,
                username = excluded.username
            "#,
        )
        .bind(user_id)
        .bind(chat_id)
        .bind(username)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Overwrites the user's sign. Last write wins.
    pub async fn set_sign(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        sign: ZodiacSign,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET sign = ? WHERE user_id = ?")
            .bind(sign.name_en())
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn find_by_user_id(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, chat_id, username, sign, created_at FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn sign_of(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Option<ZodiacSign>, sqlx::Error> {
        Ok(Self::find_by_user_id(pool, user_id)
            .await?
            .and_then(|user| user.zodiac_sign()))
    }

    pub async fn all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, chat_id, username, sign, created_at FROM users ORDER BY user_id",
        )
        .fetch_all(pool)
        .await
    }
}
