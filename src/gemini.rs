use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Error, Result};
use crate::llm::TextModel;
use crate::models::{
    GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest, GeminiResponse,
};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const TEMPERATURE: f32 = 0.7;

/// Client for the Gemini `generateContent` endpoint, non-streaming.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    async fn generate_content(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(Error::MissingCredential("GOOGLE_API_KEY"));
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Gemini error ({}): {}", status, body);
            return Err(Error::Api(format!("Gemini API error: {status}")));
        }

        let body: GeminiResponse = response.json().await?;
        body.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(Error::EmptyCompletion)
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_fails_at_first_use() {
        let client = GeminiClient::new("", "gemini-2.5-flash-lite-preview-06-17");
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, Error::MissingCredential("GOOGLE_API_KEY")));
    }
}
