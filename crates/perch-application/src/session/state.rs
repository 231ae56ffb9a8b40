//! Per-session state.

use serde::Serialize;

/// State owned by the currently loaded session.
///
/// Created by every `load_model` call and discarded on the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Unique session identifier (UUID format)
    pub session_id: String,
    /// Generation number; strictly increasing across loads.
    pub generation: u64,
    /// Model identity requested by the caller.
    pub current_model_identity: String,
    /// Whether a saved record was found and applied.
    pub current_record_applied: bool,
    /// Key used for saves made during this session.
    pub last_applied_path: String,
    /// `model_path` of the record that was applied, if any.
    pub matched_record_path: Option<String>,
}

impl SessionState {
    pub(crate) fn new(generation: u64, identity: &str) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            generation,
            current_model_identity: identity.to_string(),
            current_record_applied: false,
            last_applied_path: identity.to_string(),
            matched_record_path: None,
        }
    }
}
