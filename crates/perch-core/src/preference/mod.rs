//! Preference domain module.
//!
//! # Module Structure
//!
//! - `model`: Saved per-model record (`PreferenceRecord`) and its validation
//! - `matcher`: Ordered cascade resolving a record for a requested model
//! - `repository`: Transport trait implemented by the infrastructure crate
//! - `store`: Failure-absorbing load/save boundary (`PreferenceStore`)

mod matcher;
mod model;
mod repository;
mod store;

pub use matcher::{
    MIN_COMMON_SEGMENTS, MODEL_DESCRIPTOR_SUFFIXES, MatchResult, MatchStrategy, RequestedIdentity,
    resolve, resolve_with_strategy,
};
pub use model::{DisplayAnchor, ParameterMap, PreferenceRecord, Vec2, validate_geometry};
pub use repository::PreferenceTransport;
pub use store::PreferenceStore;
