//! Error types for every layer, plus the HTTP mapping used by the server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM API key not configured")]
    NotConfigured,

    #[error("Request timeout - the LLM API took too long to respond")]
    Timeout,

    #[error("Connection error - unable to reach the LLM API")]
    Connect,

    #[error("Authentication failed - check your API key")]
    Unauthorized,

    #[error("Access forbidden - insufficient permissions")]
    Forbidden,

    #[error("Rate limit exceeded - too many requests")]
    RateLimited,

    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("Failed to parse API response as JSON: {reason}")]
    Decode { reason: String },

    #[error("API returned empty content")]
    EmptyResponse,

    #[error("All {attempts} attempts failed. Last error: {last}")]
    Exhausted { attempts: u32, last: Box<LlmError> },
}

impl LlmError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Timeout
                | LlmError::Connect
                | LlmError::RateLimited
                | LlmError::Server { .. }
                | LlmError::Network { .. }
                | LlmError::EmptyResponse
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Journal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Journal entry is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Dream generation {id} not found")]
    NotFound { id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Invalid dream: {reason}")]
    InvalidDream { reason: String },

    #[error("LLM API key not configured")]
    NotConfigured,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures seen by API consumers.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {detail}")]
    Api { status: u16, detail: String },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::InvalidUrl(_) => None,
        }
    }
}

/// Errors raised while driving the dream form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please describe your dream first")]
    EmptyDream,

    #[error("A dream is already being generated")]
    Busy,
}

/// Error returned by HTTP handlers. Serialized as `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::InvalidDream { .. } => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            GenerationError::NotConfigured => ApiError::internal(err.to_string()),
            other => ApiError::internal(format!("Failed to generate dream content: {}", other)),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::not_found("Dream generation not found"),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "detail": self.detail })),
        )
            .into_response()
    }
}
