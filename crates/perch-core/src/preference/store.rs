//! Preference store: the persistence boundary of the overlay pipeline.

use std::sync::Arc;

use super::model::PreferenceRecord;
use super::repository::PreferenceTransport;

/// Load-all / save-one access to saved preferences.
///
/// Failures never escape this type. An unreachable backend loads as an empty
/// list (absence of preferences is a valid default state) and a failed or
/// invalid save reports `false`.
#[derive(Clone)]
pub struct PreferenceStore {
    transport: Arc<dyn PreferenceTransport>,
}

impl PreferenceStore {
    pub fn new(transport: Arc<dyn PreferenceTransport>) -> Self {
        Self { transport }
    }

    /// Fetches every stored record, or an empty list on transport failure.
    pub async fn load(&self) -> Vec<PreferenceRecord> {
        match self.transport.fetch_all().await {
            Ok(records) => {
                tracing::debug!("[PreferenceStore] Loaded {} preference record(s)", records.len());
                records
            }
            Err(e) => {
                tracing::warn!("[PreferenceStore] Failed to load preferences: {}", e);
                Vec::new()
            }
        }
    }

    /// Validates and persists one record.
    ///
    /// Returns `false` without contacting the transport when validation
    /// fails; otherwise returns the transport's success flag, with transport
    /// errors reported as `false`.
    pub async fn save(&self, record: &PreferenceRecord) -> bool {
        if let Err(e) = record.validate() {
            tracing::error!(
                "[PreferenceStore] Refusing to save preferences for '{}': {}",
                record.model_path,
                e
            );
            return false;
        }

        match self.transport.store(record).await {
            Ok(true) => {
                tracing::debug!("[PreferenceStore] Saved preferences for '{}'", record.model_path);
                true
            }
            Ok(false) => {
                tracing::warn!(
                    "[PreferenceStore] Backend rejected preferences for '{}'",
                    record.model_path
                );
                false
            }
            Err(e) => {
                tracing::error!(
                    "[PreferenceStore] Failed to save preferences for '{}': {}",
                    record.model_path,
                    e
                );
                false
            }
        }
    }
}
