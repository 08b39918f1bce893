mod config;
pub(crate) mod models;

pub use config::Config;

use crate::gemini::models::{GenerateContentRequest, GenerateContentResponse};
use crate::{Summarizer, TgdigestAiError, TgdigestAiResult};

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
        }
    }
}

impl Summarizer for GeminiClient {
    async fn summarize(&self, prompt: &str) -> TgdigestAiResult<String> {
        tracing::info!(
            endpoint = %self.endpoint,
            prompt_chars = prompt.chars().count(),
            "requesting summary from Gemini"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&GenerateContentRequest::user_prompt(prompt))
            .send()
            .await?;

        // Check status before parsing
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "Gemini API error");
            return Err(TgdigestAiError::Api(format!("{status}: {body}")));
        }

        response.json::<GenerateContentResponse>().await?.into_text()
    }
}
