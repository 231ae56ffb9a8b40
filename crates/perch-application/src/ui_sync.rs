//! UI state synchronization.
//!
//! [`UiStateSynchronizer`] owns the logical state of the overlay's UI
//! elements (lock toggle, floating buttons, popups, dismissal, persistent
//! overlays) and pushes every committed change to a [`UiView`] before the
//! transition returns.

use perch_core::surface::RenderSurface;
use perch_core::ui::{ButtonState, LockOptions, UiState, UiView};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

type PopupTimers = Arc<Mutex<HashMap<String, CancellationToken>>>;

/// Keeps the rendered UI consistent with its backing flags.
///
/// Each transition takes the state lock, commits the logical change and
/// renders it while still holding the lock, so two transitions never
/// interleave and no caller can observe a half-applied state.
pub struct UiStateSynchronizer {
    view: Arc<dyn UiView>,
    state: Mutex<UiState>,
    popups: PopupTimers,
}

impl UiStateSynchronizer {
    /// Creates a synchronizer and renders the initial (unlocked) state.
    pub fn new(view: Arc<dyn UiView>) -> Self {
        view.set_lock_icon(false);
        view.set_input_passthrough(false);
        view.set_button_cluster_visible(true);
        view.set_overlay_visible(true);
        view.set_return_button_visible(false);

        Self {
            view,
            state: Mutex::new(UiState::new()),
            popups: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn state(&self) -> MutexGuard<'_, UiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the current logical state.
    pub fn snapshot(&self) -> UiState {
        self.state().clone()
    }

    // ============================================================================
    // Lock toggle
    // ============================================================================

    pub fn is_locked(&self) -> bool {
        self.state().locked
    }

    /// Locks or unlocks the overlay.
    ///
    /// Locking shows the locked icon, lets pointer input pass through the
    /// canvas and (unless suppressed by `options`) hides the button cluster.
    /// Returns `false` without touching the view when already in `locked`.
    pub fn set_locked(&self, locked: bool, options: LockOptions) -> bool {
        let mut state = self.state();
        if state.locked == locked {
            return false;
        }
        state.locked = locked;

        self.view.set_lock_icon(locked);
        self.view.set_input_passthrough(locked);
        if !locked {
            self.view.clear_locked_hover_fade();
        }
        if options.update_floating_buttons {
            self.view
                .set_button_cluster_visible(!locked && !state.dismissed);
        }

        tracing::debug!("[UI] Lock set to {}", locked);
        true
    }

    // ============================================================================
    // Floating buttons
    // ============================================================================

    /// Registers a floating button, rendering it inactive. Re-registering an
    /// existing id keeps its state and re-renders it.
    pub fn register_button(&self, button_id: impl Into<String>) {
        let button_id = button_id.into();
        let mut state = self.state();
        let button = *state.buttons.entry(button_id.clone()).or_default();
        self.view.render_button(&button_id, button.visual());
        self.view.set_button_visible(&button_id, button.visible);
    }

    /// Removes a button and any popup timer attached to it.
    pub fn unregister_button(&self, button_id: &str) -> bool {
        let removed = self.state().buttons.remove(button_id).is_some();
        if removed {
            self.hide_popup(button_id);
        }
        removed
    }

    pub fn button(&self, button_id: &str) -> Option<ButtonState> {
        self.state().buttons.get(button_id).copied()
    }

    /// Sets a button's active flag and renders its glyphs and tint.
    /// Returns `false` for unknown ids.
    pub fn set_button_active(&self, button_id: &str, active: bool) -> bool {
        let mut state = self.state();
        let Some(button) = state.buttons.get_mut(button_id) else {
            tracing::debug!("[UI] Ignoring activation of unknown button '{}'", button_id);
            return false;
        };
        button.active = active;
        self.view.render_button(button_id, button.visual());
        true
    }

    /// Shows or hides a single button without changing its active flag.
    pub fn set_button_visible(&self, button_id: &str, visible: bool) -> bool {
        let mut state = self.state();
        let Some(button) = state.buttons.get_mut(button_id) else {
            return false;
        };
        button.visible = visible;
        self.view.set_button_visible(button_id, visible);
        true
    }

    /// Deactivates every registered button, hidden ones included.
    pub fn reset_all_buttons(&self) {
        let mut state = self.state();
        for (button_id, button) in state.buttons.iter_mut() {
            button.active = false;
            self.view.render_button(button_id, button.visual());
        }
    }

    // ============================================================================
    // Transient popups
    // ============================================================================

    /// Shows the popup attached to `button_id` and hides it after `duration`.
    ///
    /// Showing an already visible popup restarts its timer. Returns `false`
    /// for unknown ids. Must be called from within a Tokio runtime.
    pub fn show_popup(&self, button_id: &str, duration: Duration) -> bool {
        if !self.state().buttons.contains_key(button_id) {
            return false;
        }

        let token = CancellationToken::new();
        {
            let mut popups = self.popups.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = popups.insert(button_id.to_string(), token.clone()) {
                previous.cancel();
            }
            self.view.set_popup_visible(button_id, true);
        }

        let view = self.view.clone();
        let popups = self.popups.clone();
        let button_id = button_id.to_string();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(duration) => {
                    let mut popups = popups.lock().unwrap_or_else(PoisonError::into_inner);
                    if !token.is_cancelled() {
                        popups.remove(&button_id);
                        view.set_popup_visible(&button_id, false);
                    }
                }
            }
        });
        true
    }

    /// Hides a popup and cancels its timer.
    pub fn hide_popup(&self, button_id: &str) -> bool {
        let mut popups = self.popups.lock().unwrap_or_else(PoisonError::into_inner);
        match popups.remove(button_id) {
            Some(token) => {
                token.cancel();
                self.view.set_popup_visible(button_id, false);
                true
            }
            None => false,
        }
    }

    pub fn is_popup_visible(&self, button_id: &str) -> bool {
        self.popups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(button_id)
    }

    // ============================================================================
    // Dismissal
    // ============================================================================

    /// Sends the overlay away (`true`) or brings it back (`false`).
    ///
    /// While dismissed the overlay and the button cluster are hidden and the
    /// return button is shown. Returns `false` when nothing changed.
    pub fn set_dismissed(&self, dismissed: bool) -> bool {
        let mut state = self.state();
        if state.dismissed == dismissed {
            return false;
        }
        state.dismissed = dismissed;

        self.view.set_overlay_visible(!dismissed);
        self.view.set_return_button_visible(dismissed);
        self.view
            .set_button_cluster_visible(!dismissed && !state.locked);
        true
    }

    // ============================================================================
    // Persistent overlays
    // ============================================================================

    /// Replaces the persistent overlay list, dropping duplicate names.
    pub fn set_persistent_overlays<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for name in names.into_iter().map(Into::into) {
            if !name.is_empty() && !deduped.contains(&name) {
                deduped.push(name);
            }
        }
        self.state().persistent_overlay_names = deduped;
    }

    pub fn add_persistent_overlay(&self, name: impl Into<String>) -> bool {
        let name = name.into();
        let mut state = self.state();
        if name.is_empty() || state.persistent_overlay_names.contains(&name) {
            return false;
        }
        state.persistent_overlay_names.push(name);
        true
    }

    /// Stops re-asserting `name` and clears it from `surface` if given.
    pub fn remove_persistent_overlay(
        &self,
        name: &str,
        surface: Option<&mut dyn RenderSurface>,
    ) -> bool {
        let mut state = self.state();
        let before = state.persistent_overlay_names.len();
        state.persistent_overlay_names.retain(|n| n != name);
        let removed = state.persistent_overlay_names.len() != before;
        if removed {
            if let Some(surface) = surface {
                surface.clear_pose(name);
            }
        }
        removed
    }

    pub fn persistent_overlays(&self) -> Vec<String> {
        self.state().persistent_overlay_names.clone()
    }

    /// Plays every persistent overlay that is not currently active on
    /// `surface`, returning the names that were re-asserted.
    ///
    /// Overlays are tracked by name, so this works the same on a freshly
    /// loaded surface as on one whose engine cleared a pose.
    pub fn reassert_overlays(&self, surface: &mut dyn RenderSurface) -> Vec<String> {
        let names = self.persistent_overlays();
        let mut reasserted = Vec::new();
        for name in names {
            if surface.is_pose_active(&name) {
                continue;
            }
            if surface.play_named_pose(&name) {
                reasserted.push(name);
            } else {
                tracing::debug!("[UI] Model has no pose named '{}'", name);
            }
        }
        if !reasserted.is_empty() {
            tracing::trace!("[UI] Re-asserted overlays: {:?}", reasserted);
        }
        reasserted
    }
}
