//! Single-slot result stores.
//!
//! The slot holds at most one bundle. `put` overwrites, `get` never consumes,
//! so a results surface reached without a fresh submission reads the
//! previous (stale but valid) bundle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;

use super::ResultBundle;

/// Key of the one entry every store holds.
pub const RESULTS_KEY: &str = "airsafe_results";

/// Typed handoff slot between the wizard and the results surface.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Replace the stored bundle.
    async fn put(&self, bundle: &ResultBundle) -> Result<(), StoreError>;

    /// Read the stored bundle, if any.
    async fn get(&self) -> Result<Option<ResultBundle>, StoreError>;

    /// Empty the slot.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// In-process slot holding the serialized bundle.
#[derive(Default)]
pub struct MemoryResultStore {
    slot: RwLock<Option<String>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn put(&self, bundle: &ResultBundle) -> Result<(), StoreError> {
        let json = serde_json::to_string(bundle)?;
        *self.slot.write().await = Some(json);
        debug!(submission_id = %bundle.submission_id, key = RESULTS_KEY, "Stored result bundle");
        Ok(())
    }

    async fn get(&self) -> Result<Option<ResultBundle>, StoreError> {
        let slot = self.slot.read().await;
        match slot.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.write().await = None;
        Ok(())
    }
}

/// Slot persisted as a one-entry JSON object `{"airsafe_results": ...}`.
///
/// Writes go to a sibling temp file and are renamed into place, so a reader
/// never sees a half-written bundle.
pub struct FileResultStore {
    path: PathBuf,
}

impl FileResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| RESULTS_KEY.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ResultStore for FileResultStore {
    async fn put(&self, bundle: &ResultBundle) -> Result<(), StoreError> {
        let mut entries = HashMap::new();
        entries.insert(RESULTS_KEY, bundle);
        let json = serde_json::to_vec_pretty(&entries)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        info!(
            submission_id = %bundle.submission_id,
            path = %self.path.display(),
            "Result bundle written"
        );
        Ok(())
    }

    async fn get(&self) -> Result<Option<ResultBundle>, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut entries: HashMap<String, ResultBundle> = serde_json::from_slice(&raw)?;
        Ok(entries.remove(RESULTS_KEY))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
