//! Local filesystem ledger backend.
//!
//! Stores the ledger as a single JSON file. Writes go through a temp file
//! and rename so a crash mid-write never leaves a truncated ledger; a
//! truncated or hand-edited file that fails to parse degrades to an empty
//! ledger instead of aborting the run.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::state::{LedgerStore, PostLedger};

/// JSON-file ledger store.
#[derive(Debug, Clone)]
pub struct LocalLedgerStore {
    path: PathBuf,
}

impl LocalLedgerStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the raw file, returning None if it doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for LocalLedgerStore {
    async fn load(&self) -> Result<PostLedger> {
        match self.read_bytes().await? {
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(ledger) => Ok(ledger),
                Err(e) => {
                    log::warn!(
                        "Ledger at {} is unreadable ({}); starting cold",
                        self.path.display(),
                        e
                    );
                    Ok(PostLedger::default())
                }
            },
            None => Ok(PostLedger::default()),
        }
    }

    async fn save(&self, ledger: &PostLedger) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(ledger)?;
        self.write_bytes(&bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_loads_empty_ledger() {
        let tmp = TempDir::new().unwrap();
        let store = LocalLedgerStore::new(tmp.path().join("ledger.json"));

        let ledger = store.load().await.unwrap();
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalLedgerStore::new(tmp.path().join("ledger.json"));

        let mut ledger = PostLedger::default();
        ledger.mark_posted("item:42", "https://market.example/items/42", Utc::now());
        store.save(&ledger).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.record("item:42").is_some());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty_ledger() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ledger.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = LocalLedgerStore::new(&path);
        let ledger = store.load().await.unwrap();
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn save_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let store = LocalLedgerStore::new(tmp.path().join("nested/dir/ledger.json"));

        store.save(&PostLedger::default()).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let store = LocalLedgerStore::new(tmp.path().join("ledger.json"));

        store.save(&PostLedger::default()).await.unwrap();
        assert!(!tmp.path().join("ledger.tmp").exists());
    }
}
