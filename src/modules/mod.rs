//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external services like the Gemini API.

pub mod gemini;
