//! SEO assistant implementations.

mod gemini;

pub use gemini::{GeminiConfig, GeminiSeoAssistant};
