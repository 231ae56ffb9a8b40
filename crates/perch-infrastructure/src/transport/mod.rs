//! Preference transport implementations.

mod file;
mod http;

pub use file::FilePreferenceTransport;
pub use http::HttpPreferenceTransport;

use perch_core::config::StoreConfig;
use perch_core::error::{PerchError, Result};
use perch_core::preference::PreferenceTransport;
use std::sync::Arc;

/// Builds the transport selected by the store configuration.
pub fn build_transport(config: &StoreConfig) -> Result<Arc<dyn PreferenceTransport>> {
    match config {
        StoreConfig::File { path: Some(path) } => {
            Ok(Arc::new(FilePreferenceTransport::new(path.clone())))
        }
        StoreConfig::File { path: None } => {
            let transport =
                FilePreferenceTransport::new_default().map_err(|e| PerchError::config(e.to_string()))?;
            Ok(Arc::new(transport))
        }
        StoreConfig::Http { base_url } => Ok(Arc::new(HttpPreferenceTransport::new(base_url))),
    }
}
