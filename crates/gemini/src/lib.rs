//! Slide structuring backed by the Gemini `generateContent` API.

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

#[cfg(any(test, feature = "stub"))]
pub mod stub;

pub use client::{GeminiConfig, GeminiStructurer, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use error::{Result, StructuringError};
pub use prompt::build_prompt;
