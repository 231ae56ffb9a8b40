//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the root configuration
//! from the configuration file (~/.config/perch/config.toml).

use crate::paths::PerchPaths;
use perch_core::config::PerchConfig;
use perch_core::error::{PerchError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Configuration service that loads and caches the root configuration.
///
/// The file is created with default values when it does not exist. A file
/// that fails to parse falls back to defaults without being overwritten.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<PerchConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService for the default config file location.
    pub fn new_default() -> Result<Self> {
        let path = PerchPaths::config_file().map_err(|e| PerchError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    /// Creates a ConfigService for a custom file (for testing).
    ///
    /// The configuration is loaded lazily on first access.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> PerchConfig {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = match Self::load_or_create(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "[ConfigService] Using default configuration, failed to load {}: {}",
                    self.path.display(),
                    e
                );
                PerchConfig::default()
            }
        };

        // Cache it
        {
            let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    /// Writes `config` to the file and refreshes the cache.
    pub fn save_config(&self, config: &PerchConfig) -> Result<()> {
        Self::write(&self.path, config)?;
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = Some(config.clone());
        Ok(())
    }

    fn load_or_create(path: &Path) -> Result<PerchConfig> {
        if !path.exists() {
            let default_config = PerchConfig::default();
            Self::write(path, &default_config)?;
            tracing::info!("[ConfigService] Created default config at {}", path.display());
            return Ok(default_config);
        }

        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn write(path: &Path, config: &PerchConfig) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(config)?;
        let tmp_path = path.with_extension("toml.tmp");
        std::fs::write(&tmp_path, serialized)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_core::config::StoreConfig;
    use tempfile::TempDir;

    #[test]
    fn test_creates_default_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::new(path.clone());

        let config = service.get_config();
        assert_eq!(config, PerchConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_reads_existing_file_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "reapply_delay_ms = 450\n[store]\nkind = \"http\"\nbase_url = \"http://localhost:48911\"\n",
        )
        .unwrap();

        let service = ConfigService::new(path.clone());
        assert_eq!(service.get_config().reapply_delay_ms, 450);

        std::fs::write(&path, "reapply_delay_ms = 10\n").unwrap();
        assert_eq!(service.get_config().reapply_delay_ms, 450);

        service.invalidate_cache();
        let reloaded = service.get_config();
        assert_eq!(reloaded.reapply_delay_ms, 10);
        assert_eq!(reloaded.store, StoreConfig::File { path: None });
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "reapply_delay_ms = \"soon\"").unwrap();

        let service = ConfigService::new(path.clone());
        assert_eq!(service.get_config(), PerchConfig::default());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "reapply_delay_ms = \"soon\""
        );
    }

    #[test]
    fn test_save_config_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));

        let config = PerchConfig {
            save_debounce_ms: 120,
            ..PerchConfig::default()
        };
        service.save_config(&config).unwrap();
        service.invalidate_cache();
        assert_eq!(service.get_config(), config);
    }
}
