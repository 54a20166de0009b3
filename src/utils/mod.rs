//! Error type, application paths and preferences

pub mod config;
pub mod error;
pub mod paths;

// Re-export for convenience
pub use config::{Preferences, DEFAULT_PRESET};
pub use error::EasyError;
pub use paths::AppPaths;
