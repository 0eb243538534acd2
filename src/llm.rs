//! Text-generation abstraction so the persona pipeline can run against a
//! fake model in tests.

use async_trait::async_trait;

use crate::error::Result;

/// A non-streaming text model: one prompt in, one completion out.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Mock model returning queued responses and recording every prompt.
#[cfg(test)]
pub struct MockModel {
    responses: std::sync::Mutex<Vec<Result<String>>>,
    pub prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockModel {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing() -> Self {
        Self::new(vec![Err(crate::error::Error::EmptyCompletion)])
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[cfg(test)]
#[async_trait]
impl TextModel for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(String::new())
        } else {
            responses.remove(0)
        }
    }
}
