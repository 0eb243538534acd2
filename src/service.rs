use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use crate::error::Result;
use crate::llm::TextModel;
use crate::models::PersonaResponse;
use crate::persona;
use crate::reddit::RedditClient;

/// Wires the pipeline together: fetch a user's history, chunk it, extract
/// a persona, and answer chat turns against an existing persona.
pub struct PersonaService {
    reddit: Arc<RedditClient>,
    model: Arc<dyn TextModel>,
}

impl PersonaService {
    pub fn new(reddit: Arc<RedditClient>, model: Arc<dyn TextModel>) -> Self {
        Self { reddit, model }
    }

    /// Generate a persona for a Reddit username. `None` means nothing was
    /// fetched for the user (no comments and no posts), which the HTTP
    /// layer reports as not found. Extraction itself never fails; a model
    /// or parse error degrades into the all-"Unknown" fallback persona.
    pub async fn generate_for_user(&self, username: &str) -> Option<PersonaResponse> {
        let (comments, posts) = self.reddit.fetch_user_content(username).await;

        if comments.is_empty() && posts.is_empty() {
            return None;
        }

        info!(
            "Analyzing {} comments and {} posts for u/{}",
            comments.len(),
            posts.len(),
            username
        );
        Some(persona::generate_persona(&*self.model, &comments, &posts).await)
    }

    /// One chat turn against a persona supplied by the caller. No history
    /// is kept; each call stands alone.
    pub async fn chat(&self, persona: &Map<String, Value>, message: &str) -> Result<String> {
        persona::chat(&*self.model, persona, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockModel;

    #[tokio::test]
    async fn empty_fetch_yields_the_not_found_outcome() {
        // No Reddit credentials: the fetch swallows the failure into
        // empty lists, which must surface as None, not as a persona.
        let reddit = Arc::new(RedditClient::new("", "", "persona-script"));
        let model = Arc::new(MockModel::replying("{\"name\": \"Alex\"}"));
        let service = PersonaService::new(reddit, model);

        assert!(service.generate_for_user("spez").await.is_none());
    }

    #[tokio::test]
    async fn chat_passes_the_reply_through() {
        let reddit = Arc::new(RedditClient::new("", "", "persona-script"));
        let model = Arc::new(MockModel::replying("In character, hello!"));
        let service = PersonaService::new(reddit, model);

        let reply = service.chat(&Map::new(), "Hi").await.unwrap();
        assert_eq!(reply, "In character, hello!");
    }
}
