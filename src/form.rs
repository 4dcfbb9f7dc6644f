//! State of the dream form.
//!
//! Mirrors what the page at `/` keeps in the browser: the editable fields, a
//! loading flag that disables submission, the last successful result and a
//! blocking alert. At most one request is in flight; `result` is either
//! absent or the last successful response.

use crate::client::DreamApi;
use crate::error::{ClientError, FormError};
use crate::model::{DreamGeneration, DreamRequest, FormatType};
use tracing::warn;
use uuid::Uuid;

pub const GENERIC_FAILURE_ALERT: &str = "Failed to generate dream content. Please try again.";

/// Which panel is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormView {
    Input,
    Result,
}

#[derive(Debug, Clone)]
pub struct DreamForm {
    dream_text: String,
    format_type: FormatType,
    include_audio: bool,
    session_id: String,
    loading: bool,
    result: Option<DreamGeneration>,
    alert: Option<String>,
}

impl Default for DreamForm {
    fn default() -> Self {
        Self::new()
    }
}

impl DreamForm {
    pub fn new() -> Self {
        Self::with_session(Uuid::new_v4().to_string())
    }

    pub fn with_session(session_id: impl Into<String>) -> Self {
        Self {
            dream_text: String::new(),
            format_type: FormatType::Video,
            include_audio: true,
            session_id: session_id.into(),
            loading: false,
            result: None,
            alert: None,
        }
    }

    pub fn dream_text(&self) -> &str {
        &self.dream_text
    }

    pub fn format_type(&self) -> FormatType {
        self.format_type
    }

    pub fn include_audio(&self) -> bool {
        self.include_audio
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<&DreamGeneration> {
        self.result.as_ref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    // Field edits are ignored while a request is in flight.

    pub fn set_dream_text(&mut self, text: impl Into<String>) {
        if !self.loading {
            self.dream_text = text.into();
        }
    }

    pub fn select_format(&mut self, format: FormatType) {
        if !self.loading {
            self.format_type = format;
        }
    }

    pub fn set_include_audio(&mut self, include_audio: bool) {
        if !self.loading {
            self.include_audio = include_audio;
        }
    }

    pub fn toggle_audio(&mut self) {
        self.set_include_audio(!self.include_audio);
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.dream_text.trim().is_empty()
    }

    pub fn view(&self) -> FormView {
        if self.result.is_some() {
            FormView::Result
        } else {
            FormView::Input
        }
    }

    /// Enter the loading state and produce the request body.
    pub fn begin_submit(&mut self) -> Result<DreamRequest, FormError> {
        if self.loading {
            return Err(FormError::Busy);
        }
        if self.dream_text.trim().is_empty() {
            return Err(FormError::EmptyDream);
        }

        self.loading = true;
        self.alert = None;
        Ok(DreamRequest {
            dream_text: self.dream_text.clone(),
            format_type: self.format_type,
            include_audio: self.include_audio,
            session_id: Some(self.session_id.clone()),
        })
    }

    /// Leave the loading state. Failures collapse into the generic alert.
    pub fn finish_submit(&mut self, outcome: Result<DreamGeneration, ClientError>) {
        self.loading = false;
        match outcome {
            Ok(dream) => {
                self.result = Some(dream);
                self.alert = None;
            }
            Err(e) => {
                warn!(error = %e, "Dream submission failed");
                self.alert = Some(GENERIC_FAILURE_ALERT.to_string());
            }
        }
    }

    /// One full submit cycle against the API.
    pub async fn submit(&mut self, api: &dyn DreamApi) -> Result<(), FormError> {
        let request = self.begin_submit()?;
        let outcome = api.generate_dream(&request).await;
        self.finish_submit(outcome);
        Ok(())
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// "Create another dream": back to an empty input panel, same session.
    pub fn reset(&mut self) {
        if self.loading {
            return;
        }
        self.result = None;
        self.alert = None;
        self.dream_text.clear();
    }
}
