mod error;
pub mod gemini;

pub use error::*;
pub use gemini::{Config, GeminiClient};

pub trait Summarizer {
    fn summarize(&self, prompt: &str) -> impl Future<Output = TgdigestAiResult<String>>;
}
