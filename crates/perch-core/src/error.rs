//! Error types for Perch.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Perch workspace.
///
/// The variants follow the failure taxonomy of the overlay pipeline:
/// local validation, transport failures, and rendering-surface acquisition.
/// A resolution miss is not an error and has no variant here.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PerchError {
    /// A record or mutation failed local validation and never reached storage.
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// The preference transport was unreachable or reported a non-OK status.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The rendering surface for a model could not be acquired.
    #[error("Session unavailable for '{identity}': {reason}")]
    SessionUnavailable { identity: String, reason: String },

    /// An operation needed a current session but none is loaded.
    #[error("No active session")]
    NoActiveSession,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PerchError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error for the named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a SessionUnavailable error
    pub fn session_unavailable(identity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SessionUnavailable {
            identity: identity.into(),
            reason: reason.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a SessionUnavailable error
    pub fn is_session_unavailable(&self) -> bool {
        matches!(self, Self::SessionUnavailable { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PerchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PerchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PerchError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PerchError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (for collaborator implementations built on anyhow)
impl From<anyhow::Error> for PerchError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, PerchError>`.
pub type Result<T> = std::result::Result<T, PerchError>;
