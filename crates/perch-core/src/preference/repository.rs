//! Preference transport trait.

use async_trait::async_trait;

use super::model::PreferenceRecord;
use crate::error::Result;

/// An abstract transport for persisting and retrieving preference records.
///
/// This trait decouples the preference store from the storage mechanism
/// (HTTP endpoint, local JSON file, in-memory fake).
///
/// # Implementation Notes
///
/// - `fetch_all` is an idempotent read of every stored record. Entries that
///   cannot be decoded should be skipped rather than failing the whole list.
/// - `store` writes one record keyed by its `model_path` and reports the
///   backend's success flag. Transport-level failures are returned as `Err`.
#[async_trait]
pub trait PreferenceTransport: Send + Sync {
    /// Fetches all stored records.
    async fn fetch_all(&self) -> Result<Vec<PreferenceRecord>>;

    /// Stores one record, returning the backend's success flag.
    async fn store(&self, record: &PreferenceRecord) -> Result<bool>;
}
