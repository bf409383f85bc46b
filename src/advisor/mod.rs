mod gemini;
pub mod prompt;

pub use gemini::{GeminiClient, Recommender, DEFAULT_BASE_URL, DEFAULT_MODEL};
