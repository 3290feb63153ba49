//! Ledger storage backends.
//!
//! - [`MemoryLedgerStore`]: process-local map, used in tests and by default
//! - [`FileLedgerStore`]: a single JSON object on disk, one entry per key

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::repository::{LedgerStore, RepositoryError, RepositoryResult};

/// In-memory ledger storage.
#[derive(Clone, Default)]
pub struct MemoryLedgerStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn read(&self, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> RepositoryResult<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> RepositoryResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Ledger storage persisted as one JSON object file.
///
/// Every write rewrites the file through a temporary sibling and a rename, so a
/// crash mid-write leaves the previous contents in place.
pub struct FileLedgerStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> RepositoryResult<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                RepositoryError::CorruptData(format!(
                    "Ledger file {} is corrupt: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`Self::load`], but a file that no longer decodes counts as empty
    /// so the next save replaces it. I/O failures still propagate.
    async fn load_or_discard_corrupt(&self) -> RepositoryResult<BTreeMap<String, String>> {
        match self.load().await {
            Err(RepositoryError::CorruptData(msg)) => {
                log::warn!("Discarding corrupt ledger file: {}", msg);
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> RepositoryResult<()> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for FileLedgerStore {
    async fn read(&self, key: &str) -> RepositoryResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn write(&self, key: &str, value: String) -> RepositoryResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load_or_discard_corrupt().await?;
        entries.insert(key.to_string(), value);
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> RepositoryResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load_or_discard_corrupt().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}
