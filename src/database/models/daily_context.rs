use sqlx::FromRow;

/// Cached generated context for one local date, stored as JSON.
#[derive(Debug, Clone, FromRow)]
pub struct DailyContextRow {
    pub date: String,
    pub context_json: String,
}

impl DailyContextRow {
    pub async fn find_by_date(
        pool: &sqlx::SqlitePool,
        date: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, DailyContextRow>(
            "SELECT date, context_json FROM daily_context WHERE date = ?",
        )
        .bind(date)
        .fetch_optional(pool)
        .await
    }

    pub async fn save(
        pool: &sqlx::SqlitePool,
        date: &str,
        context_json: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO daily_context (date, context_json)
            VALUES (?, ?)
            ON CONFLICT(date) DO UPDATE SET context_json = excluded.context_json
            "#,
        )
        .bind(date)
        .bind(context_json)
        .execute(pool)
        .await?;
        Ok(())
    }
}
