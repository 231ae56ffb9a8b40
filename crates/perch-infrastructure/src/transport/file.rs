//! JSON file preference transport.
//!
//! Stores every record in a single JSON array file. Saving replaces the record
//! with the same `model_path` in place, or appends a new one. Writes go to a
//! temporary sibling file that is then renamed over the original.

use async_trait::async_trait;
use perch_core::error::{PerchError, Result};
use perch_core::preference::{PreferenceRecord, PreferenceTransport};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::dto::decode_records;
use crate::paths::{PathError, PerchPaths};

/// File-based preference transport.
pub struct FilePreferenceTransport {
    path: PathBuf,
    /// Serializes read-modify-write cycles within the process.
    write_lock: Mutex<()>,
}

impl FilePreferenceTransport {
    /// Creates a transport over the default preferences file.
    pub fn new_default() -> std::result::Result<Self, PathError> {
        Ok(Self::new(PerchPaths::preferences_file()?))
    }

    /// Creates a transport over a custom file (for testing).
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<PreferenceRecord>> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| PerchError::io(format!("Failed to read preferences file: {}", e)))?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let payload: Value = serde_json::from_str(&content)?;
        decode_records(payload)
    }

    async fn write_records(&self, records: &[PreferenceRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PerchError::io(format!("Failed to create directory: {}", e)))?;
        }

        let serialized = serde_json::to_string_pretty(records)?;
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, serialized)
            .await
            .map_err(|e| PerchError::io(format!("Failed to write preferences file: {}", e)))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| PerchError::io(format!("Failed to replace preferences file: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl PreferenceTransport for FilePreferenceTransport {
    async fn fetch_all(&self) -> Result<Vec<PreferenceRecord>> {
        self.read_records().await
    }

    async fn store(&self, record: &PreferenceRecord) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_records().await?;
        match records.iter_mut().find(|r| r.model_path == record.model_path) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }

        self.write_records(&records).await?;
        tracing::debug!(
            "[FilePreferenceTransport] Wrote {} record(s) to {}",
            records.len(),
            self.path.display()
        );
        Ok(true)
    }
}
