use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// API Models

#[derive(Deserialize)]
pub struct PersonaRequest {
    pub username: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub persona: Map<String, Value>,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Deserialize)]
pub struct SavePersonaRequest {
    pub username: String,
    pub persona: Map<String, Value>,
}

#[derive(Serialize)]
pub struct SavedPersona {
    pub filename: String,
    pub file_url: String,
}

/// A generated persona. Fields without a value are left out of the JSON
/// body entirely; `raw_data` is accepted on input but never produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frustrations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<Value>,
}

// Gemini Models

#[derive(Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
pub struct GeminiGenerationConfig {
    pub temperature: f32,
}

#[derive(Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
pub struct GeminiPart {
    pub text: String,
}

#[derive(Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
pub struct GeminiCandidate {
    pub content: GeminiContent,
}

// Reddit Models

#[derive(Deserialize)]
pub struct RedditTokenResponse {
    pub access_token: String,
}

#[derive(Deserialize)]
pub struct RedditListing {
    pub data: RedditListingData,
}

#[derive(Deserialize)]
pub struct RedditListingData {
    #[serde(default)]
    pub children: Vec<RedditThing>,
}

#[derive(Deserialize)]
pub struct RedditThing {
    pub data: RedditItem,
}

#[derive(Deserialize, Default)]
pub struct RedditItem {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub selftext: Option<String>,
}
