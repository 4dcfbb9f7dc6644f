use super::{prompt, LLMRequest, LLMResponse, StoryWriter};
use crate::config::LlmConfig;
use crate::error::LlmError;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const RETRY_DELAY_MS: u64 = 1000;

/// [`StoryWriter`] backed by an OpenAI-compatible chat-completions API.
#[derive(Clone)]
pub struct ChatStoryWriter {
    client: Client,
    config: LlmConfig,
    retry_delay: Duration,
}

impl ChatStoryWriter {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LlmError::Network {
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            config,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        })
    }

    /// Base delay between attempts; attempt `n` waits `n * delay`.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn build_request(&self, session_id: &str, dream_text: &str) -> LLMRequest {
        LLMRequest {
            model: self.config.model.clone(),
            messages: prompt::story_messages(dream_text),
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
            user: Some(session_id.to_string()),
        }
    }

    /// Single HTTP round trip, no retries.
    async fn make_llm_request(&self, api_key: &str, body: &LLMRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else if e.is_connect() {
                    LlmError::Connect
                } else {
                    LlmError::Network {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status.as_u16() {
                401 => LlmError::Unauthorized,
                403 => LlmError::Forbidden,
                429 => LlmError::RateLimited,
                code @ 500..=599 => LlmError::Server { status: code, body },
                code => LlmError::Http { status: code, body },
            });
        }

        let parsed: LLMResponse = response.json().await.map_err(|e| LlmError::Decode {
            reason: e.to_string(),
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(content.trim().to_string())
    }
}

#[async_trait::async_trait]
impl StoryWriter for ChatStoryWriter {
    #[instrument(skip(self, dream_text))]
    async fn write_story(&self, session_id: &str, dream_text: &str) -> Result<String, LlmError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(LlmError::NotConfigured)?;
        let body = self.build_request(session_id, dream_text);
        let max_retries = self.config.max_retries.max(1);

        let mut attempt = 1;
        loop {
            match self.make_llm_request(api_key, &body).await {
                Ok(story) => {
                    debug!(attempt, model = %self.config.model, story_chars = story.len(), "Story generated");
                    return Ok(story);
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= max_retries => {
                    return Err(LlmError::Exhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    warn!(attempt, max_retries, error = %e, "Story attempt failed");
                    tokio::time::sleep(self.retry_delay * attempt).await;
                    attempt += 1;
                }
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LlmConfig {
        LlmConfig {
            api_key: Some("test-key".to_string()),
            model: "test-model".to_string(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn request_carries_session_and_tuning() {
        let writer = ChatStoryWriter::new(config()).unwrap();
        let req = writer.build_request("session-1", "a red door");
        assert_eq!(req.model, "test-model");
        assert_eq!(req.user.as_deref(), Some("session-1"));
        assert_eq!(req.max_tokens, Some(900));
        assert_eq!(req.messages.len(), 2);

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[tokio::test]
    async fn missing_key_fails_fast() {
        let writer = ChatStoryWriter::new(LlmConfig::default()).unwrap();
        assert!(!writer.is_configured());
        let err = writer.write_story("s", "dream").await.unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured));
    }
}
