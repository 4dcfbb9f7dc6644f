//! Append-only JSON-lines journal: one tagged entry per line.
//!
//! Updates append a fresh `dream` entry for the same id, so on replay the
//! last line for an id wins. A torn final line (crash mid-write) is cut
//! off on open so later appends start on a clean line.

use super::memory::MemoryStore;
use super::{DreamStore, StoreResult};
use crate::error::StoreError;
use crate::model::{DreamGeneration, StatusCheck};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
enum JournalEntry {
    Dream(DreamGeneration),
    Status(StatusCheck),
}

pub struct JournalStore {
    path: PathBuf,
    file: Mutex<File>,
    index: MemoryStore,
}

impl JournalStore {
    /// Create / open a journal file and replay it into memory.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let index = MemoryStore::new();
        let replayed = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                let outcome = replay(&contents, &index).await?;
                repair_tail(&path, &contents, outcome.valid_len).await?;
                outcome.applied
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        info!(path = %path.display(), entries = replayed, "Journal opened");

        Ok(Self {
            path,
            file: Mutex::new(file),
            index,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, entry: &JournalEntry) -> StoreResult<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

struct ReplayOutcome {
    applied: usize,
    /// Byte length of the intact prefix, up to and including the last good line.
    valid_len: usize,
}

async fn replay(contents: &str, index: &MemoryStore) -> StoreResult<ReplayOutcome> {
    let chunks: Vec<&str> = contents.split_inclusive('\n').collect();
    let last = chunks.len().saturating_sub(1);
    let mut applied = 0;
    let mut offset = 0;
    let mut valid_len = 0;

    for (n, chunk) in chunks.iter().enumerate() {
        offset += chunk.len();
        let line = chunk.trim();
        if line.is_empty() {
            valid_len = offset;
            continue;
        }

        match serde_json::from_str::<JournalEntry>(line) {
            Ok(JournalEntry::Dream(dream)) => index.upsert_dream(dream).await,
            Ok(JournalEntry::Status(status)) => index.push_status(status).await,
            Err(e) if n == last => {
                warn!(line = n + 1, error = %e, "Dropping torn journal tail");
                break;
            }
            Err(e) => return Err(StoreError::Serde(e)),
        }
        applied += 1;
        valid_len = offset;
    }

    Ok(ReplayOutcome { applied, valid_len })
}

/// Cut a torn tail and make sure the next append starts on a fresh line.
async fn repair_tail(path: &Path, contents: &str, valid_len: usize) -> StoreResult<()> {
    let intact = &contents[..valid_len];
    let needs_newline = !intact.is_empty() && !intact.ends_with('\n');
    if valid_len < contents.len() {
        let file = OpenOptions::new().write(true).open(path).await?;
        file.set_len(valid_len as u64).await?;
    }
    if needs_newline {
        let mut file = OpenOptions::new().append(true).open(path).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl DreamStore for JournalStore {
    async fn insert_dream(&self, dream: &DreamGeneration) -> StoreResult<()> {
        self.append(&JournalEntry::Dream(dream.clone())).await?;
        self.index.insert_dream(dream).await
    }

    async fn update_dream(&self, dream: &DreamGeneration) -> StoreResult<()> {
        if !self.index.contains_dream(&dream.id).await {
            return Err(StoreError::NotFound {
                id: dream.id.clone(),
            });
        }
        self.append(&JournalEntry::Dream(dream.clone())).await?;
        self.index.update_dream(dream).await
    }

    async fn get_dream(&self, id: &str) -> StoreResult<Option<DreamGeneration>> {
        self.index.get_dream(id).await
    }

    async fn dreams_for_session(
        &self,
        session_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<DreamGeneration>> {
        self.index.dreams_for_session(session_id, limit).await
    }

    async fn insert_status(&self, status: &StatusCheck) -> StoreResult<()> {
        self.append(&JournalEntry::Status(status.clone())).await?;
        self.index.insert_status(status).await
    }

    async fn list_status(&self, limit: usize) -> StoreResult<Vec<StatusCheck>> {
        self.index.list_status(limit).await
    }
}
