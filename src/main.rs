mod chunker;
mod config;
mod error;
mod gemini;
mod llm;
mod models;
mod persona;
mod reddit;
mod service;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dotenv::dotenv;
use serde_json::json;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::llm::TextModel;
use crate::models::{
    ChatRequest, ChatResponse, PersonaRequest, PersonaResponse, SavePersonaRequest, SavedPersona,
};
use crate::reddit::RedditClient;
use crate::service::PersonaService;
use crate::storage::PersonaStore;

#[derive(Clone)]
struct AppState {
    service: Arc<PersonaService>,
    store: Arc<PersonaStore>,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("invalid configuration");

    let reddit = Arc::new(RedditClient::new(
        &config.reddit_client_id,
        &config.reddit_client_secret,
        &config.reddit_user_agent,
    ));
    let model: Arc<dyn TextModel> =
        Arc::new(GeminiClient::new(&config.google_api_key, &config.gemini_model));
    let store =
        Arc::new(PersonaStore::new(&config.persona_dir).expect("persona directory must be usable"));

    let state = AppState {
        service: Arc::new(PersonaService::new(reddit, model)),
        store,
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/api/persona", post(create_persona))
        .route("/api/chat", post(chat_with_persona))
        .route("/api/save-persona", post(save_persona))
        .nest_service("/static", ServeDir::new("static"))
        .nest_service("/personas", ServeDir::new(&config.persona_dir))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!("Persona chat listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

use axum_macros::debug_handler;

#[debug_handler]
async fn create_persona(
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(request): Json<PersonaRequest>,
) -> Result<Json<PersonaResponse>, ApiError> {
    match state.service.generate_for_user(&request.username).await {
        Some(persona) => Ok(Json(persona)),
        None => Err(ApiError::not_found(format!(
            "No data found for Reddit user: {}",
            request.username
        ))),
    }
}

async fn chat_with_persona(
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    match state.service.chat(&request.persona, &request.message).await {
        Ok(response) => Ok(Json(ChatResponse { response })),
        Err(e) => {
            tracing::error!("Chat with persona failed: {}", e);
            Err(ApiError::internal(e.to_string()))
        }
    }
}

async fn save_persona(
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(request): Json<SavePersonaRequest>,
) -> Result<Json<SavedPersona>, ApiError> {
    match state.store.save(&request.username, &request.persona) {
        Ok(saved) => Ok(Json(saved)),
        Err(e) => {
            tracing::error!("Failed to save persona: {}", e);
            Err(ApiError::internal(format!("Failed to save persona: {e}")))
        }
    }
}

/// Error body shape shared by every endpoint: a status plus a `detail`
/// message.
struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn not_found(detail: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail,
        }
    }

    fn internal(detail: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
