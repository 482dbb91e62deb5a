//! Vibe generation: daily context and personal answers.
//!
//! The daily context (affirmation, global summary, per-sign vibes) is
//! generated with one JSON-mode completion over the news snippet and the
//! sign profiles, then the summary is rewritten into a one-sentence channel
//! intro with a second completion. The result is cached per local date so
//! generation happens at most once a day.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::database::connection::DatabaseManager;
use crate::database::models::DailyContextRow;
use crate::services::llm::LlmClient;
use crate::services::news::NewsFetcher;
use crate::signs::{SignBook, SignProfile, ZodiacSign};

/// Fallback vibe when the model left a sign out of its JSON.
pub const FORMING_TEXT: &str = "Вайб формується. Перевір пізніше.";

const DAILY_SYSTEM_PROMPT: &str = "Ти редактор астрологічних прогнозів. Стисло підсумуй новини дня \
    у підбадьорливий «Вайб дня» для кожного знаку зодіаку. Використовуй надані риси знаків, щоб \
    персоналізувати текст. Кожен вайб має містити рівно 4 речення: перше про те, як поводитись \
    сьогодні, друге про особисті переваги, третє про кохання, четверте про гроші. Варіюй слова, \
    щоб вайби не виглядали однаковими. Відповідай лише українською.";

const PERSONAL_SYSTEM_PROMPT: &str =
    "Ти лаконічний астрологічний радник. Відповідай лише українською.";

/// Generated context for one day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyVibes {
    #[serde(default)]
    pub affirmation: String,
    #[serde(default)]
    pub global_summary: String,
    /// Vibe text keyed by canonical English sign name.
    #[serde(default)]
    pub vibes: HashMap<String, String>,
}

impl DailyVibes {
    pub fn vibe_for(&self, sign: ZodiacSign) -> &str {
        self.vibes
            .get(sign.name_en())
            .map(String::as_str)
            .unwrap_or(FORMING_TEXT)
    }
}

/// Builds the user prompt for the daily JSON generation.
pub fn build_daily_prompt(news_text: &str, signs_payload: &serde_json::Value) -> String {
    format!(
        "Повідомлення з джерела новин:\n{news}\n\nКонфіг знаків:\n{signs}\n\n\
         Поверни JSON з ключами: affirmation (коротке 1 речення), global_summary (рядок) \
         і vibes (обʼєкт: англійська назва знаку -> текст вайбу). Лише JSON.",
        news = news_text,
        signs = signs_payload,
    )
}

/// Builds the prompt that turns the raw global summary into a one-sentence
/// channel intro.
pub fn build_summary_prompt(news_text: &str, raw_summary: &str) -> String {
    format!(
        "Напиши коротке інтро до щоденних зодіак-прогнозів у Telegram-каналі. \
         Це НЕ дайджест новин, а настрій дня перед прогнозами. Візьми 1 факт із новин \
         і обіграй його непрямо, без слова 'НОВИНИ'. Рівно 1 речення, до 140 символів. \
         Без шаблонного оптимізму.\n\n{news_text}\n\n{raw_summary}"
    )
}

/// Builds the prompt for answering a user's free-text question.
pub fn build_personal_prompt(
    sign: ZodiacSign,
    profile: &SignProfile,
    context: &DailyVibes,
    question: &str,
) -> String {
    format!(
        "Знак користувача: {display}\nРиси: {traits}\nСпецифіка: {specificity}\n\
         Вайб дня: {vibe}\nГлобальний підсумок: {summary}\n\n\
         Питання користувача: {question}\n\n\
         Відповідай як практичний астрологічний коуч у 3–5 реченнях. Будь конкретним, \
         повʼязуй пораду з вайбом і рисами, уникай категоричних тверджень. \
         Відповідай лише українською.",
        display = sign.display(),
        traits = profile.traits.join(", "),
        specificity = profile.specificity,
        vibe = context.vibe_for(sign),
        summary = context.global_summary,
    )
}

/// Generates and caches daily vibes, and answers personal questions.
pub struct VibeService {
    llm: LlmClient,
    db: Arc<DatabaseManager>,
    news: NewsFetcher,
    signs: SignBook,
    timezone: chrono_tz::Tz,
}

impl VibeService {
    pub fn new(
        llm: LlmClient,
        db: Arc<DatabaseManager>,
        news: NewsFetcher,
        signs: SignBook,
        timezone: chrono_tz::Tz,
    ) -> Self {
        Self {
            llm,
            db,
            news,
            signs,
            timezone,
        }
    }

    pub fn sign_book(&self) -> &SignBook {
        &self.signs
    }

    /// Local date in the configured timezone, the cache key.
    pub fn today_key(&self) -> String {
        Utc::now().with_timezone(&self.timezone).date_naive().to_string()
    }

    /// Loads today's context from the cache or generates and stores it.
    pub async fn daily_vibes(&self) -> Result<DailyVibes> {
        let today = self.today_key();

        if let Some(row) = DailyContextRow::find_by_date(&self.db.pool, &today).await? {
            match serde_json::from_str(&row.context_json) {
                Ok(cached) => return Ok(cached),
                Err(e) => {
                    warn!("Discarding unreadable cached context for {}: {}", today, e);
                }
            }
        }

        let generated = self.generate().await?;
        let json = serde_json::to_string(&generated)?;
        DailyContextRow::save(&self.db.pool, &today, &json).await?;
        info!("Generated daily context for {}", today);
        Ok(generated)
    }

    async fn generate(&self) -> Result<DailyVibes> {
        let snippet = self.news.snippet().await;
        info!("Generating daily vibes with news from {}", snippet.source.label());

        let prompt = build_daily_prompt(&snippet.text, &self.signs.prompt_payload());
        let raw = self
            .llm
            .complete_json(DAILY_SYSTEM_PROMPT, &prompt, 0.6)
            .await?;
        let mut context: DailyVibes =
            serde_json::from_str(&raw).context("Model returned invalid daily context JSON")?;

        // Rewrite the raw summary into a short channel intro.
        if !context.global_summary.is_empty() {
            let summary_prompt = build_summary_prompt(&snippet.text, &context.global_summary);
            context.global_summary = self
                .llm
                .complete(DAILY_SYSTEM_PROMPT, &summary_prompt, 0.7)
                .await?;
        }

        Ok(context)
    }

    /// One completion for a user question, grounded in today's context.
    /// No retry: the caller maps errors to a generic apology.
    pub async fn answer_question(&self, sign: ZodiacSign, question: &str) -> Result<String> {
        let profile = self.signs.profile(sign).cloned().unwrap_or_default();
        let context = self.daily_vibes().await?;
        let prompt = build_personal_prompt(sign, &profile, &context, question);
        self.llm.complete(PERSONAL_SYSTEM_PROMPT, &prompt, 0.7).await
    }

    /// Today's vibe for one sign, generating the context if needed.
    pub async fn vibe_for(&self, sign: ZodiacSign) -> Result<String> {
        let context = self.daily_vibes().await?;
        Ok(context.vibe_for(sign).to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_vibe_for_falls_back_when_missing() {
        let context = DailyVibes::default();
        assert_eq!(context.vibe_for(ZodiacSign::Leo), FORMING_TEXT);
    }

    #[test]
    fn test_vibe_for_reads_english_key() {
        let mut context = DailyVibes::default();
        context
            .vibes
            .insert("Leo".to_string(), "сяй сьогодні".to_string());
        assert_eq!(context.vibe_for(ZodiacSign::Leo), "сяй сьогодні");
    }

    #[test]
    fn test_daily_vibes_tolerates_partial_json() {
        let context: DailyVibes = serde_json::from_str(r#"{"affirmation":"так"}"#).unwrap();
        assert_eq!(context.affirmation, "так");
        assert!(context.global_summary.is_empty());
        assert!(context.vibes.is_empty());
    }
}
