//! UI state domain models and the view trait.
//!
//! The logical state lives in `perch_application::UiStateSynchronizer`;
//! this module only defines the data it owns and the view it drives.

mod model;
mod view;

pub use model::{ButtonState, ButtonTint, ButtonVisual, LockOptions, UiState};
pub use view::UiView;
