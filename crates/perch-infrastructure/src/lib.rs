//! Infrastructure layer for Perch: preference transports, path management
//! and configuration loading.

pub mod config_service;
pub mod dto;
pub mod paths;
pub mod transport;

pub use crate::config_service::ConfigService;
pub use crate::paths::PerchPaths;
pub use crate::transport::{FilePreferenceTransport, HttpPreferenceTransport, build_transport};
