//! Gemini module for AI text generation
//!
//! Provides a REST client for the Google Generative Language API
//! (`generateContent`). Only single-turn text prompts are supported;
//! homework explanations never use tools or media parts.

mod client;

pub use client::GeminiClient;
