//! Data transfer objects for external storage formats.

mod preference;

pub use preference::{SaveResponse, decode_records};
