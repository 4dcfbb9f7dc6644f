//! # Story writing
//!
//! Turns a dream description into a narrative through an OpenAI-compatible
//! chat-completions endpoint.
//!
//! ```text
//! dream text → prompt.rs (system + user prompt) → chat.rs (HTTP, retries) → story
//! ```
//!
//! The pipeline only depends on the [`StoryWriter`] trait, so tests and
//! alternate providers can plug in without touching the generator.

pub mod chat;
pub mod prompt;

use crate::error::LlmError;
use serde::{Deserialize, Serialize};

pub use chat::ChatStoryWriter;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Opaque end-user id. Carries the dream session so the provider can group turns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LLMResponse {
    pub choices: Vec<Choice>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Choice {
    pub message: Message,
}

/// Anything that can turn a dream into a story.
#[async_trait::async_trait]
pub trait StoryWriter: Send + Sync {
    async fn write_story(&self, session_id: &str, dream_text: &str) -> Result<String, LlmError>;

    /// `false` when the writer has no credentials and every call would fail.
    fn is_configured(&self) -> bool {
        true
    }
}
