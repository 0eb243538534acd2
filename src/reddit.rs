use reqwest::{header::USER_AGENT, Client};

use crate::error::{Error, Result};
use crate::models::{RedditItem, RedditListing, RedditTokenResponse};

const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const REDDIT_API_URL: &str = "https://oauth.reddit.com";

/// Newest-first item cap per listing.
const FETCH_LIMIT: u32 = 100;

/// App-only client for the Reddit API. A fresh token is requested per
/// fetch; nothing is cached across calls.
pub struct RedditClient {
    client: Client,
    client_id: String,
    client_secret: String,
    user_agent: String,
    token_url: String,
    base_url: String,
}

impl RedditClient {
    pub fn new(client_id: &str, client_secret: &str, user_agent: &str) -> Self {
        Self {
            client: Client::new(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            user_agent: user_agent.to_string(),
            token_url: REDDIT_TOKEN_URL.to_string(),
            base_url: REDDIT_API_URL.to_string(),
        }
    }

    /// Fetch a user's newest comments and posts, capped at 100 each.
    ///
    /// Any failure reaching Reddit (missing credentials, network, unknown
    /// user, rate limiting) is logged and collapsed into a pair of empty
    /// lists; callers cannot tell "no content" from "fetch failed".
    pub async fn fetch_user_content(&self, username: &str) -> (Vec<String>, Vec<String>) {
        match self.fetch_history(username).await {
            Ok(history) => history,
            Err(e) => {
                tracing::error!("Error retrieving Reddit data for user {}: {}", username, e);
                (Vec::new(), Vec::new())
            }
        }
    }

    async fn fetch_history(&self, username: &str) -> Result<(Vec<String>, Vec<String>)> {
        let token = self.access_token().await?;

        let comments = self.user_listing(&token, username, "comments").await?;
        let posts = self.user_listing(&token, username, "submitted").await?;

        Ok((comment_bodies(comments), submission_texts(posts)))
    }

    async fn access_token(&self) -> Result<String> {
        if self.client_id.is_empty() {
            return Err(Error::MissingCredential("REDDIT_CLIENT_ID"));
        }

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(USER_AGENT, &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "Reddit token request failed: {}",
                response.status()
            )));
        }

        let body: RedditTokenResponse = response.json().await?;
        Ok(body.access_token)
    }

    async fn user_listing(
        &self,
        token: &str,
        username: &str,
        kind: &str,
    ) -> Result<Vec<RedditItem>> {
        let url = format!(
            "{}/user/{}/{}?limit={}&sort=new",
            self.base_url, username, kind, FETCH_LIMIT
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "Reddit listing request failed: {}",
                response.status()
            )));
        }

        let listing: RedditListing = response.json().await?;
        Ok(listing
            .data
            .children
            .into_iter()
            .map(|thing| thing.data)
            .collect())
    }
}

fn comment_bodies(items: Vec<RedditItem>) -> Vec<String> {
    items.into_iter().filter_map(|item| item.body).collect()
}

/// Downstream analysis sees both halves of a post, so title and body are
/// joined with a newline.
fn submission_texts(items: Vec<RedditItem>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| {
            format!(
                "{}\n{}",
                item.title.unwrap_or_default(),
                item.selftext.unwrap_or_default()
            )
        })
        .collect()
}
