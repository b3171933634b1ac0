//! Gemini `generateContent` client used to draft presentations.

pub mod client;
pub mod models;
pub mod prompt;

pub use client::{parse_presentation, GeminiClient, GeminiError};
