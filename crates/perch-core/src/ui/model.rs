//! UI state domain models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Background tint of a floating button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonTint {
    Idle,
    Active,
}

/// What a floating button looks like for a given logical state.
///
/// Exactly one of the paired glyphs is visible at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonVisual {
    pub off_glyph_visible: bool,
    pub on_glyph_visible: bool,
    pub tint: ButtonTint,
}

impl ButtonVisual {
    pub fn for_active(active: bool) -> Self {
        Self {
            off_glyph_visible: !active,
            on_glyph_visible: active,
            tint: if active {
                ButtonTint::Active
            } else {
                ButtonTint::Idle
            },
        }
    }
}

/// Logical state of one floating button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonState {
    pub active: bool,
    pub visible: bool,
}

impl Default for ButtonState {
    fn default() -> Self {
        Self {
            active: false,
            visible: true,
        }
    }
}

impl ButtonState {
    pub fn visual(&self) -> ButtonVisual {
        ButtonVisual::for_active(self.active)
    }
}

/// Options for a lock transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOptions {
    /// Also show/hide the floating button cluster (default: true).
    pub update_floating_buttons: bool,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            update_floating_buttons: true,
        }
    }
}

impl LockOptions {
    /// Lock transition that leaves the button cluster untouched.
    pub fn keep_buttons() -> Self {
        Self {
            update_floating_buttons: false,
        }
    }
}

/// Snapshot of every UI element's logical state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub locked: bool,
    /// Whether the overlay has been sent away (the return affordance is shown).
    pub dismissed: bool,
    pub buttons: BTreeMap<String, ButtonState>,
    /// Pose names that must be continuously re-asserted, in order.
    pub persistent_overlay_names: Vec<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the buttons currently active.
    pub fn active_buttons(&self) -> Vec<&str> {
        self.buttons
            .iter()
            .filter(|(_, b)| b.active)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}
