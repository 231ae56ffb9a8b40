pub mod config_path;
pub mod list;
pub mod resolve;
pub mod save;

use anyhow::{Context, Result};
use perch_core::preference::PreferenceStore;
use perch_infrastructure::{ConfigService, build_transport};
use std::path::PathBuf;

/// Config service for `--config` if given, otherwise the default location.
pub fn config_service(config: Option<PathBuf>) -> Result<ConfigService> {
    match config {
        Some(path) => Ok(ConfigService::new(path)),
        None => ConfigService::new_default().context("Failed to locate config file"),
    }
}

/// Opens the preference store selected by the configuration.
pub fn open_store(config: Option<PathBuf>) -> Result<PreferenceStore> {
    let settings = config_service(config)?.get_config();
    let transport =
        build_transport(&settings.store).context("Failed to set up the preference store")?;
    Ok(PreferenceStore::new(transport))
}
