use super::{DreamStore, StoreResult};
use crate::error::StoreError;
use crate::model::{DreamGeneration, StatusCheck};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Inner {
    dreams: HashMap<String, DreamGeneration>,
    order: Vec<String>,
    statuses: Vec<StatusCheck>,
}

/// In-memory store. Contents live as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite, keeping the original insertion slot.
    pub(crate) async fn upsert_dream(&self, dream: DreamGeneration) {
        let mut inner = self.inner.write().await;
        if !inner.dreams.contains_key(&dream.id) {
            inner.order.push(dream.id.clone());
        }
        inner.dreams.insert(dream.id.clone(), dream);
    }

    pub(crate) async fn push_status(&self, status: StatusCheck) {
        self.inner.write().await.statuses.push(status);
    }

    pub(crate) async fn contains_dream(&self, id: &str) -> bool {
        self.inner.read().await.dreams.contains_key(id)
    }

    pub async fn dream_count(&self) -> usize {
        self.inner.read().await.dreams.len()
    }
}

#[async_trait::async_trait]
impl DreamStore for MemoryStore {
    async fn insert_dream(&self, dream: &DreamGeneration) -> StoreResult<()> {
        self.upsert_dream(dream.clone()).await;
        debug!(id = %dream.id, "Dream stored");
        Ok(())
    }

    async fn update_dream(&self, dream: &DreamGeneration) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        match inner.dreams.get_mut(&dream.id) {
            Some(existing) => {
                *existing = dream.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                id: dream.id.clone(),
            }),
        }
    }

    async fn get_dream(&self, id: &str) -> StoreResult<Option<DreamGeneration>> {
        Ok(self.inner.read().await.dreams.get(id).cloned())
    }

    async fn dreams_for_session(
        &self,
        session_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<DreamGeneration>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.dreams.get(id))
            .filter(|dream| dream.session_id == session_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_status(&self, status: &StatusCheck) -> StoreResult<()> {
        self.push_status(status.clone()).await;
        Ok(())
    }

    async fn list_status(&self, limit: usize) -> StoreResult<Vec<StatusCheck>> {
        let inner = self.inner.read().await;
        Ok(inner.statuses.iter().take(limit).cloned().collect())
    }
}
