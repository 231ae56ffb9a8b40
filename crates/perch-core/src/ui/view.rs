//! UI view trait.

use super::model::ButtonVisual;

/// The visual side of the overlay's UI elements, addressed by id.
///
/// Implementations only render; they never hold logical state. Every method
/// is synchronous and must fully apply before returning.
pub trait UiView: Send + Sync {
    /// Shows the locked or unlocked lock icon.
    fn set_lock_icon(&self, locked: bool);

    /// When `true`, pointer input passes through the model canvas to whatever
    /// is behind it.
    fn set_input_passthrough(&self, passthrough: bool);

    /// Removes the hover fade applied to the overlay while locked.
    fn clear_locked_hover_fade(&self);

    fn set_button_cluster_visible(&self, visible: bool);

    fn render_button(&self, button_id: &str, visual: ButtonVisual);

    fn set_button_visible(&self, button_id: &str, visible: bool);

    fn set_popup_visible(&self, button_id: &str, visible: bool);

    fn set_overlay_visible(&self, visible: bool);

    fn set_return_button_visible(&self, visible: bool);
}
