//! Domain layer for Perch.
//!
//! Contains the preference model and matching cascade, the collaborator
//! traits (rendering surface, window placement, preference transport), the
//! default layout computation and the UI state model.

pub mod config;
pub mod error;
pub mod preference;
pub mod surface;
pub mod ui;
pub mod viewport;

// Re-export common error type
pub use error::PerchError;
