//! Root configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::viewport::DEFAULT_MOBILE_WIDTH_THRESHOLD;

/// Where preference records are persisted.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    /// JSON file on disk. `None` uses the default path under the config dir.
    File {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
    /// HTTP preference endpoint (`{base_url}/api/config/preferences`).
    Http { base_url: String },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File { path: None }
    }
}

/// Timing and layout settings, stored as `config.toml`.
///
/// Every field has a default so partial files load cleanly.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PerchConfig {
    /// Delay before saved parameters are applied a second time after load.
    pub reapply_delay_ms: u64,
    /// Quiet period before a burst of geometry/parameter mutations is saved.
    pub save_debounce_ms: u64,
    /// Period of the saved-parameter re-assertion ticker. `0` disables it.
    pub parameter_reassert_interval_ms: u64,
    /// Period of the persistent overlay re-assertion ticker. `0` disables it.
    pub overlay_reassert_interval_ms: u64,
    pub mobile_width_threshold: f64,
    /// Offset added to a saved display anchor before moving the window, so the
    /// target point lands inside the remembered display.
    pub display_offset: f64,
    pub store: StoreConfig,
}

impl Default for PerchConfig {
    fn default() -> Self {
        Self {
            reapply_delay_ms: 300,
            save_debounce_ms: 500,
            parameter_reassert_interval_ms: 0,
            overlay_reassert_interval_ms: 250,
            mobile_width_threshold: DEFAULT_MOBILE_WIDTH_THRESHOLD,
            display_offset: 10.0,
            store: StoreConfig::default(),
        }
    }
}

impl PerchConfig {
    pub fn reapply_delay(&self) -> Duration {
        Duration::from_millis(self.reapply_delay_ms)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn parameter_reassert_interval(&self) -> Option<Duration> {
        non_zero_millis(self.parameter_reassert_interval_ms)
    }

    pub fn overlay_reassert_interval(&self) -> Option<Duration> {
        non_zero_millis(self.overlay_reassert_interval_ms)
    }
}

fn non_zero_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
