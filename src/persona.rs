//! Persona extraction and roleplay chat on top of a [`TextModel`].
//!
//! Extraction is best-effort: the model is asked for a JSON object inside
//! a markdown code block, and anything that fails to parse collapses into
//! the all-"Unknown" fallback persona rather than an error.

use serde_json::{Map, Value};

use crate::chunker::{self, TextChunk};
use crate::error::Result;
use crate::llm::TextModel;
use crate::models::PersonaResponse;

pub const UNKNOWN: &str = "Unknown";

/// Personality note used when no traits could be extracted.
pub const FALLBACK_PERSONALITY: &str =
    "Could not determine personality traits from the available data.";

/// Prompt-size bounds: at most this many chunks, then at most this many
/// characters of combined text.
const MAX_CHUNKS: usize = 50;
const MAX_PROMPT_CHARS: usize = 10_000;
const CHUNK_DELIMITER: &str = "\n---\n";

/// The fixed trait schema: field name plus the description shown to the
/// model in the format instructions.
const TRAIT_FIELDS: &[(&str, &str)] = &[
    ("name", "Likely first name based on content or \"Unknown\""),
    ("occupation", "Likely occupation or interests"),
    ("status", "Relationship or life status if mentioned"),
    ("location", "Location if mentioned or \"Unknown\""),
    ("archetype", "Personality archetype that best describes this person"),
    ("personality", "Key personality traits"),
    ("behavior", "Typical behaviors and interaction patterns"),
    ("habits", "Regular habits or routines mentioned"),
    ("goals", "Goals or aspirations mentioned"),
    ("needs", "Psychological or emotional needs"),
    ("frustrations", "Common frustrations or pain points"),
];

const PERSONA_PROMPT: &str = r#"You are an expert psychologist and personality analyzer. Analyze the following Reddit posts and comments to create a detailed persona.

INSTRUCTIONS:
1. Carefully analyze the user's writing style, opinions, interests, and behaviors
2. Extract key personality traits, habits, and preferences
3. Create a comprehensive persona based on the data
4. Format your response as a structured JSON object

REDDIT DATA:
{text_data}

OUTPUT FORMAT:
{format_instructions}
"#;

const CHAT_PROMPT: &str = r#"SYSTEM: You are now roleplaying as a persona based on the following profile.
Respond to the user's message in character, maintaining the personality traits, speech patterns,
and knowledge that would be consistent with this persona. Be authentic and engaging.

PERSONA PROFILE:
{persona}

USER MESSAGE: {message}
"#;

/// Generate a persona from a user's comments and posts. Never fails:
/// extraction errors collapse into the fallback persona.
pub async fn generate_persona(
    model: &dyn TextModel,
    comments: &[String],
    posts: &[String],
) -> PersonaResponse {
    let chunks = chunker::prepare_documents(comments, posts);
    if let Some(last) = chunks.last() {
        tracing::debug!(
            "Prepared {} chunks, last from {:?} item {}",
            chunks.len(),
            last.source,
            last.index
        );
    }
    let traits = extract_traits(model, &chunks).await;

    if traits.is_empty() {
        return fallback_persona();
    }

    PersonaResponse {
        name: Some(trait_value(&traits, "name")),
        occupation: Some(trait_value(&traits, "occupation")),
        status: Some(trait_value(&traits, "status")),
        location: Some(trait_value(&traits, "location")),
        archetype: Some(trait_value(&traits, "archetype")),
        personality: Some(trait_value(&traits, "personality")),
        behavior: Some(trait_value(&traits, "behavior")),
        habits: Some(trait_value(&traits, "habits")),
        goals: Some(trait_value(&traits, "goals")),
        needs: Some(trait_value(&traits, "needs")),
        frustrations: Some(trait_value(&traits, "frustrations")),
        raw_data: None,
    }
}

/// Prompt the model with the bounded chunk text and parse its reply into
/// a trait map. Any model or parse failure yields an empty map.
pub async fn extract_traits(model: &dyn TextModel, chunks: &[TextChunk]) -> Map<String, Value> {
    let combined = chunks
        .iter()
        .take(MAX_CHUNKS)
        .map(|chunk| chunk.content.as_str())
        .collect::<Vec<_>>()
        .join(CHUNK_DELIMITER);

    let prompt = PERSONA_PROMPT
        .replace("{text_data}", truncate_chars(&combined, MAX_PROMPT_CHARS))
        .replace("{format_instructions}", &format_instructions());

    let response = match model.generate(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Error generating persona: {}", e);
            return Map::new();
        }
    };

    parse_traits(&response)
}

/// Chat once with a persona. The model's reply is returned verbatim;
/// model errors propagate to the caller.
pub async fn chat(
    model: &dyn TextModel,
    persona: &Map<String, Value>,
    message: &str,
) -> Result<String> {
    let prompt = CHAT_PROMPT
        .replace("{persona}", &persona_context(persona))
        .replace("{message}", message);
    model.generate(&prompt).await
}

/// Render persona fields as `key: value` lines, skipping empty and other
/// valueless entries.
pub fn persona_context(persona: &Map<String, Value>) -> String {
    persona
        .iter()
        .filter_map(|(key, value)| render_value(value).map(|rendered| format!("{key}: {rendered}")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A field counts as valued when it would render to something visible;
/// nulls, empty strings, empty containers, and `false` are skipped.
pub(crate) fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn format_instructions() -> String {
    let mut out = String::from(
        "Return a single JSON object inside a ```json markdown code block, with exactly these string fields:\n",
    );
    for (field, description) in TRAIT_FIELDS {
        out.push_str(&format!("  \"{field}\": {description}\n"));
    }
    out
}

fn parse_traits(response: &str) -> Map<String, Value> {
    let json_str = strip_code_fences(response);
    match serde_json::from_str::<Value>(&json_str) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            tracing::error!("Model response was not a JSON object");
            Map::new()
        }
        Err(e) => {
            tracing::error!("Error parsing JSON: {}", e);
            Map::new()
        }
    }
}

fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

fn trait_value(traits: &Map<String, Value>, field: &str) -> String {
    traits
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn fallback_persona() -> PersonaResponse {
    PersonaResponse {
        name: Some(UNKNOWN.to_string()),
        occupation: Some(UNKNOWN.to_string()),
        status: Some(UNKNOWN.to_string()),
        location: Some(UNKNOWN.to_string()),
        archetype: Some(UNKNOWN.to_string()),
        personality: Some(FALLBACK_PERSONALITY.to_string()),
        behavior: Some(UNKNOWN.to_string()),
        habits: Some(UNKNOWN.to_string()),
        goals: Some(UNKNOWN.to_string()),
        needs: Some(UNKNOWN.to_string()),
        frustrations: Some(UNKNOWN.to_string()),
        raw_data: None,
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::Source;
    use crate::llm::MockModel;
    use serde_json::json;

    fn chunk(content: &str) -> TextChunk {
        TextChunk {
            content: content.to_string(),
            source: Source::Comment,
            index: 0,
        }
    }

    #[test]
    fn format_instructions_names_every_field() {
        let instructions = format_instructions();
        for (field, _) in TRAIT_FIELDS {
            assert!(instructions.contains(&format!("\"{field}\"")));
        }
    }

    #[tokio::test]
    async fn fenced_json_is_recovered_exactly() {
        let model = MockModel::replying(
            "```json\n{\"name\": \"Alex\", \"occupation\": \"Engineer\"}\n```",
        );
        let traits = extract_traits(&model, &[chunk("some text")]).await;
        assert_eq!(traits.get("name"), Some(&json!("Alex")));
        assert_eq!(traits.get("occupation"), Some(&json!("Engineer")));
    }

    #[tokio::test]
    async fn invalid_json_yields_an_empty_trait_map() {
        let model = MockModel::replying("I am not JSON, sorry.");
        let traits = extract_traits(&model, &[chunk("some text")]).await;
        assert!(traits.is_empty());
    }

    #[tokio::test]
    async fn unparseable_response_falls_back_to_unknown_persona() {
        let model = MockModel::replying("not json");
        let persona =
            generate_persona(&model, &["I love hiking".to_string()], &[]).await;
        assert_eq!(persona.name.as_deref(), Some(UNKNOWN));
        assert_eq!(persona.occupation.as_deref(), Some(UNKNOWN));
        assert_eq!(persona.status.as_deref(), Some(UNKNOWN));
        assert_eq!(persona.location.as_deref(), Some(UNKNOWN));
        assert_eq!(persona.archetype.as_deref(), Some(UNKNOWN));
        assert_eq!(persona.personality.as_deref(), Some(FALLBACK_PERSONALITY));
        assert_eq!(persona.behavior.as_deref(), Some(UNKNOWN));
        assert_eq!(persona.habits.as_deref(), Some(UNKNOWN));
        assert_eq!(persona.goals.as_deref(), Some(UNKNOWN));
        assert_eq!(persona.needs.as_deref(), Some(UNKNOWN));
        assert_eq!(persona.frustrations.as_deref(), Some(UNKNOWN));
    }

    #[tokio::test]
    async fn model_errors_also_fall_back_to_unknown_persona() {
        let model = MockModel::failing();
        let persona =
            generate_persona(&model, &["I love hiking".to_string()], &[]).await;
        assert_eq!(persona.personality.as_deref(), Some(FALLBACK_PERSONALITY));
        assert_eq!(persona.name.as_deref(), Some(UNKNOWN));
    }

    #[tokio::test]
    async fn missing_fields_default_to_unknown() {
        let model = MockModel::replying("{\"name\": \"Alex\"}");
        let persona =
            generate_persona(&model, &["I love hiking".to_string()], &[]).await;
        assert_eq!(persona.name.as_deref(), Some("Alex"));
        assert_eq!(persona.occupation.as_deref(), Some(UNKNOWN));
    }

    #[tokio::test]
    async fn prompt_is_bounded_to_fifty_chunks() {
        let chunks: Vec<TextChunk> = (0..60)
            .map(|i| chunk(&format!("chunk-{i}-marker")))
            .collect();
        let model = MockModel::replying("{}");
        extract_traits(&model, &chunks).await;
        let prompt = model.last_prompt();
        assert!(prompt.contains("chunk-49-marker"));
        assert!(!prompt.contains("chunk-50-marker"));
    }

    #[tokio::test]
    async fn prompt_text_is_capped_at_ten_thousand_characters() {
        let model = MockModel::replying("{}");
        extract_traits(&model, &[chunk(&"x".repeat(12_000))]).await;
        let prompt = model.last_prompt();
        assert!(prompt.contains(&"x".repeat(10_000)));
        assert!(!prompt.contains(&"x".repeat(10_001)));
    }

    #[tokio::test]
    async fn chat_returns_the_model_text_verbatim() {
        let model = MockModel::replying("  Hey there, fellow hiker!  ");
        let persona = Map::new();
        let reply = chat(&model, &persona, "Hi").await.unwrap();
        assert_eq!(reply, "  Hey there, fellow hiker!  ");
    }

    #[tokio::test]
    async fn chat_errors_propagate() {
        let model = MockModel::failing();
        let persona = Map::new();
        assert!(chat(&model, &persona, "Hi").await.is_err());
    }

    #[tokio::test]
    async fn chat_prompt_omits_empty_fields() {
        let model = MockModel::replying("ok");
        let mut persona = Map::new();
        persona.insert("name".to_string(), json!("Alex"));
        persona.insert("occupation".to_string(), json!(""));
        persona.insert("location".to_string(), Value::Null);
        chat(&model, &persona, "Hi").await.unwrap();
        let prompt = model.last_prompt();
        assert!(prompt.contains("name: Alex"));
        assert!(!prompt.contains("occupation"));
        assert!(!prompt.contains("location"));
        assert!(prompt.contains("USER MESSAGE: Hi"));
    }

    #[test]
    fn persona_context_keeps_only_valued_fields() {
        let mut persona = Map::new();
        persona.insert("name".to_string(), json!("Alex"));
        persona.insert("occupation".to_string(), json!(""));
        let context = persona_context(&persona);
        assert_eq!(context, "name: Alex");
    }
}
