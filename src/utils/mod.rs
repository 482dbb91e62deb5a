/// Small text helpers for news snippets and prompts
pub mod text;
