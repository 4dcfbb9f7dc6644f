//! Wire and record types shared by the form, the client and the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Output format requested for a dream.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormatType {
    #[default]
    Video,
    Podcast,
}

impl FormatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatType::Video => "video",
            FormatType::Podcast => "podcast",
        }
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for FormatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(FormatType::Video),
            "podcast" => Ok(FormatType::Podcast),
            other => Err(format!("unknown format '{}', expected video or podcast", other)),
        }
    }
}

fn default_include_audio() -> bool {
    true
}

/// Body of `POST /api/generate-dream`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DreamRequest {
    pub dream_text: String,
    #[serde(default)]
    pub format_type: FormatType,
    #[serde(default = "default_include_audio")]
    pub include_audio: bool,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Processing,
    StoryGenerated,
    Completed,
    Failed,
}

/// A persisted generation, returned verbatim to the form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DreamGeneration {
    pub id: String,
    pub dream_text: String,
    pub generated_story: String,
    pub format_type: FormatType,
    pub include_audio: bool,
    pub status: GenerationStatus,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

impl DreamGeneration {
    /// Fresh record for a story that has just come back from the LLM.
    pub fn from_story(request: &DreamRequest, session_id: String, story: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            dream_text: request.dream_text.clone(),
            generated_story: story,
            format_type: request.format_type,
            include_audio: request.include_audio,
            status: GenerationStatus::StoryGenerated,
            video_url: None,
            audio_url: None,
            session_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

impl From<StatusCheckCreate> for StatusCheck {
    fn from(input: StatusCheckCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_name: input.client_name,
            timestamp: Utc::now(),
        }
    }
}

/// Body of `GET /api/`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiInfo {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_match_form_defaults() {
        let req: DreamRequest = serde_json::from_str(r#"{"dream_text": "flying"}"#).unwrap();
        assert_eq!(req.format_type, FormatType::Video);
        assert!(req.include_audio);
        assert!(req.session_id.is_none());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = serde_json::from_str::<DreamRequest>(
            r#"{"dream_text": "flying", "format_type": "invalid_format"}"#,
        );
        assert!(err.is_err());
        assert!("hologram".parse::<FormatType>().is_err());
        assert_eq!(" Podcast ".parse::<FormatType>().unwrap(), FormatType::Podcast);
    }

    #[test]
    fn status_uses_snake_case() {
        let json = serde_json::to_string(&GenerationStatus::StoryGenerated).unwrap();
        assert_eq!(json, "\"story_generated\"");
    }
}
