use std::env;

/// Runtime configuration, read once at startup and passed explicitly into
/// the clients that need it. Credentials are not validated here; an empty
/// key surfaces as an error the first time a client uses it.
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,
    pub persona_dir: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let google_api_key = env::var("GOOGLE_API_KEY").unwrap_or_default();
        let gemini_model = env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| "gemini-2.5-flash-lite-preview-06-17".to_string());

        let reddit_client_id = env::var("REDDIT_CLIENT_ID").unwrap_or_default();
        let reddit_client_secret = env::var("REDDIT_CLIENT_SECRET").unwrap_or_default();
        let reddit_user_agent =
            env::var("REDDIT_USER_AGENT").unwrap_or_else(|_| "persona-script".to_string());

        let persona_dir = env::var("PERSONA_DIR").unwrap_or_else(|_| "personas".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string()).parse()?;

        Ok(Self {
            google_api_key,
            gemini_model,
            reddit_client_id,
            reddit_client_secret,
            reddit_user_agent,
            persona_dir,
            port,
        })
    }
}
