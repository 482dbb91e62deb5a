pub mod broadcast;
pub mod sign;
pub mod vibe;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "snake_case", description = "Команди Astro Vibe Bot:")]
pub enum Command {
    #[command(description = "показати цю довідку")]
    Help,
    #[command(description = "почати роботу з ботом")]
    Start,
    #[command(description = "обрати знак зодіаку, напр. /set_sign Лев")]
    SetSign { sign: String },
    #[command(description = "вайб дня для твого знаку")]
    Vibe,
    #[command(description = "надіслати прогноз у канал (лише адміни)")]
    BroadcastNow,
}
