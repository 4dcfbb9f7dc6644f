//! The dream generation pipeline behind `POST /api/generate-dream`.

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::llm::StoryWriter;
use crate::media::MediaPlanner;
use crate::model::{DreamGeneration, DreamRequest, GenerationStatus};
use crate::store::DreamStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};
use uuid::Uuid;

pub struct DreamGenerator {
    writer: Arc<dyn StoryWriter>,
    store: Arc<dyn DreamStore>,
    media: MediaPlanner,
    max_dream_chars: usize,
}

impl DreamGenerator {
    pub fn new(
        writer: Arc<dyn StoryWriter>,
        store: Arc<dyn DreamStore>,
        config: &GenerationConfig,
    ) -> Self {
        Self {
            writer,
            store,
            media: MediaPlanner::new(config.media_base_url.clone()),
            max_dream_chars: config.max_dream_chars,
        }
    }

    pub fn store(&self) -> &Arc<dyn DreamStore> {
        &self.store
    }

    /// Validate, write the story, persist it and attach media links.
    #[instrument(skip(self, request), fields(format = %request.format_type))]
    pub async fn generate(&self, request: DreamRequest) -> Result<DreamGeneration, GenerationError> {
        let start = Instant::now();
        let result = self.run(request).await;

        match &result {
            Ok(dream) => info!(
                id = %dream.id,
                session_id = %dream.session_id,
                story_chars = dream.generated_story.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Dream generated"
            ),
            Err(e) => error!(error = %e, "Error generating dream content"),
        }

        result
    }

    async fn run(&self, request: DreamRequest) -> Result<DreamGeneration, GenerationError> {
        self.validate(&request)?;

        let session_id = request
            .session_id
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if !self.writer.is_configured() {
            return Err(GenerationError::NotConfigured);
        }

        let story = self
            .writer
            .write_story(&session_id, &request.dream_text)
            .await?;

        let mut dream = DreamGeneration::from_story(&request, session_id, story);
        self.store.insert_dream(&dream).await?;

        self.media.attach(&mut dream);
        dream.status = GenerationStatus::Completed;
        self.store.update_dream(&dream).await?;

        Ok(dream)
    }

    fn validate(&self, request: &DreamRequest) -> Result<(), GenerationError> {
        let text = request.dream_text.trim();
        if text.is_empty() {
            return Err(GenerationError::InvalidDream {
                reason: "dream_text cannot be empty".to_string(),
            });
        }

        let chars = text.chars().count();
        if chars > self.max_dream_chars {
            return Err(GenerationError::InvalidDream {
                reason: format!(
                    "dream_text too long: {} > {} characters",
                    chars, self.max_dream_chars
                ),
            });
        }

        Ok(())
    }
}
