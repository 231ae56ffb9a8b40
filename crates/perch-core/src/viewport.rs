//! Viewport metrics and the default overlay layout.

use serde::{Deserialize, Serialize};

use crate::preference::Vec2;

/// Anchor applied whenever the layout is reset.
pub const DEFAULT_ANCHOR: Vec2 = Vec2::new(0.65, 0.75);

/// Upper bound for the default scale on any device class.
pub const MAX_DEFAULT_SCALE: f64 = 0.5;

/// Window widths at or below this are treated as mobile.
pub const DEFAULT_MOBILE_WIDTH_THRESHOLD: f64 = 768.0;

/// Size of the hosting window and of the renderer drawing into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub window_width: f64,
    pub window_height: f64,
    pub renderer_width: f64,
    pub renderer_height: f64,
}

impl Viewport {
    /// Viewport whose renderer fills the whole window.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            window_width: width,
            window_height: height,
            renderer_width: width,
            renderer_height: height,
        }
    }

    pub fn with_renderer(mut self, width: f64, height: f64) -> Self {
        self.renderer_width = width;
        self.renderer_height = height;
        self
    }

    pub fn device_class(&self, mobile_width_threshold: f64) -> DeviceClass {
        if self.window_width <= mobile_width_threshold {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

/// Geometry the overlay returns to on reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultLayout {
    pub anchor: Vec2,
    pub position: Vec2,
    pub scale: Vec2,
}

/// Computes the default layout for a viewport.
///
/// The scale is the minimum of a fixed cap and two viewport-relative
/// candidates, so it stops growing on large screens and shrinks on small ones.
/// Mobile centers the model horizontally near the top; desktop parks it in
/// the bottom-right corner.
pub fn default_layout(viewport: &Viewport, mobile_width_threshold: f64) -> DefaultLayout {
    let (scale, position) = match viewport.device_class(mobile_width_threshold) {
        DeviceClass::Mobile => {
            let scale = MAX_DEFAULT_SCALE
                .min(viewport.window_height * 1.3 / 4000.0)
                .min(viewport.window_width * 1.2 / 2000.0);
            let position = Vec2::new(
                viewport.renderer_width * 0.5,
                viewport.renderer_height * 0.28,
            );
            (scale, position)
        }
        DeviceClass::Desktop => {
            let scale = MAX_DEFAULT_SCALE
                .min(viewport.window_height * 0.75 / 7000.0)
                .min(viewport.window_width * 0.6 / 7000.0);
            let position = Vec2::new(viewport.renderer_width, viewport.renderer_height);
            (scale, position)
        }
    };

    DefaultLayout {
        anchor: DEFAULT_ANCHOR,
        position,
        scale: Vec2::splat(scale),
    }
}
