//! Application layer for Perch.
//!
//! Coordinates the domain types from `perch-core` over time: the session
//! controller loads and persists per-model preferences, and the UI state
//! synchronizer keeps overlay affordances consistent with their flags.

pub mod session;
pub mod ui_sync;

pub use session::{SessionController, SessionState};
pub use ui_sync::UiStateSynchronizer;
