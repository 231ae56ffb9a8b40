//! Preference record domain model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PerchError, Result};

/// A two-component value used for both position and scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates a uniform vector (`x == y`), as used for scale.
    pub const fn splat(value: f64) -> Self {
        Self { x: value, y: value }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Screen-space point remembered so the overlay window can be moved back to
/// the same monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayAnchor {
    pub screen_x: f64,
    pub screen_y: f64,
}

impl DisplayAnchor {
    pub const fn new(screen_x: f64, screen_y: f64) -> Self {
        Self { screen_x, screen_y }
    }

    pub fn is_finite(&self) -> bool {
        self.screen_x.is_finite() && self.screen_y.is_finite()
    }
}

/// Named pose/shape parameter overrides, ordered by name for stable output.
pub type ParameterMap = BTreeMap<String, f64>;

/// Saved per-model overlay preferences.
///
/// Records are treated as immutable snapshots: the `with_*` builders consume
/// the record and return a new one, and the session controller produces a
/// fresh record for every save.
///
/// # Wire format
///
/// ```json
/// {
///   "model_path": "/static/Hiyori/Hiyori.model3.json",
///   "position": { "x": 1280.0, "y": 720.0 },
///   "scale": { "x": 0.12, "y": 0.12 },
///   "parameters": { "ParamAngleX": 10.0 },
///   "display": { "screenX": 1920.0, "screenY": 0.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    /// Identifier of the model asset this record applies to. May be stale.
    pub model_path: String,
    pub position: Vec2,
    pub scale: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayAnchor>,
}

impl PreferenceRecord {
    /// Creates a record with geometry only.
    pub fn new(model_path: impl Into<String>, position: Vec2, scale: Vec2) -> Self {
        Self {
            model_path: model_path.into(),
            position,
            scale,
            parameters: None,
            display: None,
        }
    }

    pub fn with_parameters(mut self, parameters: ParameterMap) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_display(mut self, display: DisplayAnchor) -> Self {
        self.display = Some(display);
        self
    }

    /// Returns true when the record carries at least one parameter override.
    pub fn has_parameters(&self) -> bool {
        self.parameters.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Checks the persistence invariants.
    ///
    /// - `position` must be finite
    /// - `scale` must be finite and strictly positive on both axes
    /// - every parameter value must be finite
    /// - `display`, when present, must be finite
    pub fn validate(&self) -> Result<()> {
        validate_geometry(self.position, self.scale)?;

        if let Some(parameters) = &self.parameters {
            if let Some((name, value)) = parameters.iter().find(|(_, v)| !v.is_finite()) {
                return Err(PerchError::validation(
                    format!("parameters.{name}"),
                    format!("value {value} is not finite"),
                ));
            }
        }

        if let Some(display) = &self.display {
            if !display.is_finite() {
                return Err(PerchError::validation(
                    "display",
                    format!("anchor {display:?} is not finite"),
                ));
            }
        }

        Ok(())
    }
}

/// Validates a position/scale pair before it is applied or persisted.
pub fn validate_geometry(position: Vec2, scale: Vec2) -> Result<()> {
    if !position.is_finite() {
        return Err(PerchError::validation(
            "position",
            format!("({}, {}) is not finite", position.x, position.y),
        ));
    }
    if !scale.is_finite() {
        return Err(PerchError::validation(
            "scale",
            format!("({}, {}) is not finite", scale.x, scale.y),
        ));
    }
    if scale.x <= 0.0 || scale.y <= 0.0 {
        return Err(PerchError::validation(
            "scale",
            format!("({}, {}) must be strictly positive", scale.x, scale.y),
        ));
    }
    Ok(())
}
