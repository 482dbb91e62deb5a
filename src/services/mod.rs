pub mod broadcast;
pub mod health;
pub mod llm;
pub mod news;
pub mod vibe;
