//! Session management for the currently loaded model.
//!
//! # Module Structure
//!
//! - `controller`: `SessionController`, load / apply / mutate / persist
//! - `generation`: Owner of every timer a session spawns
//! - `debounce`: Coalescing of mutation bursts into one save
//! - `state`: Per-session state returned to callers

mod controller;
mod debounce;
mod generation;
mod state;

pub use controller::SessionController;
pub use debounce::SaveDebouncer;
pub use generation::Generation;
pub use state::SessionState;
