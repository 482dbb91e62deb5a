//! # Astro Vibe Bot Main Entry Point
//!
//! Initializes logging, loads configuration and sign profiles, sets up the
//! database, starts the daily broadcast scheduler, and runs the Telegram
//! bot alongside the health check server.

use anyhow::Result;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bot;
mod config;
mod database;
mod services;
mod signs;
mod utils;

use std::sync::Arc;

use crate::bot::handlers::BotHandler;
use crate::bot::AppContext;
use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::services::broadcast::BroadcastService;
use crate::services::health::HealthService;
use crate::services::llm::LlmClient;
use crate::services::news::NewsFetcher;
use crate::services::vibe::VibeService;
use crate::signs::SignBook;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "astro_vibe_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Astro Vibe Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, Timezone: {}, HTTP Port: {}",
        config.database_url, config.timezone, config.http_port
    );

    // Initialize database
    info!("Initializing database connection...");
    let db = Arc::new(DatabaseManager::new(&config.database_url).await?);
    db.run_migrations().await?;
    info!("Database initialized successfully");

    // Load sign profiles
    let signs = SignBook::load(&config.signs_path)?;
    info!("Loaded {} sign profiles from {}", signs.signs().len(), config.signs_path);

    // Resolve the news source; a broken channel session only disables that feature
    let news = NewsFetcher::from_config(&config).await;

    let llm = LlmClient::new(&config.openai_api_key, &config.openai_model);
    let vibes = Arc::new(VibeService::new(
        llm,
        db.clone(),
        news,
        signs,
        config.timezone,
    ));

    // Initialize bot
    let bot = Bot::new(&config.telegram_bot_token);
    let config = Arc::new(config);
    let ctx = Arc::new(AppContext {
        db: db.clone(),
        vibes: vibes.clone(),
        config: config.clone(),
    });
    let handler = BotHandler::new(ctx);
    info!("Telegram bot initialized successfully");

    // Start the daily broadcast scheduler
    let mut broadcaster = BroadcastService::new(bot.clone(), vibes, db.clone(), &config).await?;
    broadcaster.start().await?;

    // Health check server
    let health_service = HealthService::new(db, config.timezone);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;
    info!("Health check server starting on port {}", config.http_port);

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = broadcaster.stop().await {
        tracing::warn!("Error stopping broadcast scheduler: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
