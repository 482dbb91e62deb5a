//! # Astro Vibe Bot
//!
//! A Telegram bot that sends daily horoscope-style "vibe" messages per
//! zodiac sign, answers free-text questions through a chat-completion API,
//! and broadcasts to a channel on a daily schedule.
//!
//! ## Features
//! - Per-user zodiac sign selection with strict name normalization
//! - Daily vibe generation enriched with news from an RSS feed or a
//!   Telegram channel read via a personal-account client
//! - Timezone-aware daily broadcast to users and a channel
//! - Persistent storage with SQLite

/// Bot command handlers and message routing
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database connection, migrations and row models
pub mod database;
/// Vibe generation, news fetching, broadcast and health services
pub mod services;
/// Zodiac sign enumeration and configured profiles
pub mod signs;
/// Utility functions for text handling
pub mod utils;
