//! Persistence for dream generations and status checks.
//!
//! Two backends share the [`DreamStore`] trait:
//! - [`MemoryStore`]: process-lifetime maps, the default.
//! - [`JournalStore`]: append-only JSON-lines file, replayed on open.

pub mod journal;
pub mod memory;

use crate::error::StoreError;
use crate::model::{DreamGeneration, StatusCheck};

pub use journal::JournalStore;
pub use memory::MemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Listing cap for `GET /api/dreams/session/:id`.
pub const SESSION_LIST_LIMIT: usize = 100;
/// Listing cap for `GET /api/status`.
pub const STATUS_LIST_LIMIT: usize = 1000;

#[async_trait::async_trait]
pub trait DreamStore: Send + Sync {
    async fn insert_dream(&self, dream: &DreamGeneration) -> StoreResult<()>;

    /// Replace an existing record. Unknown ids are [`StoreError::NotFound`].
    async fn update_dream(&self, dream: &DreamGeneration) -> StoreResult<()>;

    async fn get_dream(&self, id: &str) -> StoreResult<Option<DreamGeneration>>;

    /// Records for one session in insertion order, at most `limit`.
    async fn dreams_for_session(
        &self,
        session_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<DreamGeneration>>;

    async fn insert_status(&self, status: &StatusCheck) -> StoreResult<()>;

    async fn list_status(&self, limit: usize) -> StoreResult<Vec<StatusCheck>>;
}

#[cfg(test)]
mod tests;
