//! Traits for the external collaborators a session drives.
//!
//! The rendering engine and the window manager are opaque to Perch; these
//! traits describe the narrow capabilities the session controller uses.

use async_trait::async_trait;

use crate::error::Result;
use crate::preference::{ParameterMap, Vec2};
use crate::viewport::Viewport;

/// A loaded model on the rendering engine.
///
/// All calls are synchronous from the caller's perspective.
pub trait RenderSurface: Send {
    fn set_anchor(&mut self, anchor: Vec2);

    fn set_scale(&mut self, scale: Vec2);

    fn set_position(&mut self, position: Vec2);

    fn position(&self) -> Vec2;

    fn scale(&self) -> Vec2;

    /// Writes named parameter values onto the model.
    fn apply_parameters(&mut self, parameters: &ParameterMap);

    /// Plays a named pose (expression). Returns `false` if the model does not
    /// know the name.
    fn play_named_pose(&mut self, name: &str) -> bool;

    fn clear_pose(&mut self, name: &str);

    /// Whether the named pose is currently applied. The engine clears poses on
    /// its own (e.g. when a motion completes).
    fn is_pose_active(&self, name: &str) -> bool;
}

/// Options passed through to the rendering engine when acquiring a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    pub viewport: Viewport,
}

impl LoadOptions {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }
}

/// Acquires rendering surfaces for model identities.
#[async_trait]
pub trait SurfaceProvider: Send + Sync {
    /// Loads the model named by `identity`.
    ///
    /// # Errors
    ///
    /// Any error is treated as fatal for the calling `load_model`.
    async fn acquire(&self, identity: &str, options: &LoadOptions) -> Result<Box<dyn RenderSurface>>;
}

/// Result of asking the window manager to move the overlay window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    Moved,
    /// The window already sits on the target display.
    SameDisplay,
    Failed(String),
}

/// Optional capability for moving the overlay window between displays.
#[async_trait]
pub trait WindowPlacement: Send + Sync {
    async fn move_window_to_display(&self, screen_x: f64, screen_y: f64) -> Result<PlacementOutcome>;
}
