//! Placeholder media links for a generation.
//!
//! Nothing renders video or audio yet; the links follow the layout the
//! eventual media service will serve from.

use crate::model::{DreamGeneration, FormatType};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaLinks {
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MediaPlanner {
    base_url: String,
}

impl MediaPlanner {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Video gets an mp4 plus an optional narration track; a podcast is audio only.
    pub fn plan(&self, id: &str, format: FormatType, include_audio: bool) -> MediaLinks {
        match format {
            FormatType::Video => MediaLinks {
                video_url: Some(format!("{}/video/{}.mp4", self.base_url, id)),
                audio_url: include_audio.then(|| format!("{}/audio/{}.mp3", self.base_url, id)),
            },
            FormatType::Podcast => MediaLinks {
                video_url: None,
                audio_url: Some(format!("{}/podcast/{}.mp3", self.base_url, id)),
            },
        }
    }

    pub fn attach(&self, generation: &mut DreamGeneration) {
        let links = self.plan(
            &generation.id,
            generation.format_type,
            generation.include_audio,
        );
        generation.video_url = links.video_url;
        generation.audio_url = links.audio_url;
    }
}
