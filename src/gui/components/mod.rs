//! GUI components

pub mod field;
pub mod url_input;

// Re-export for convenience
pub use field::{input, labelled};
pub use url_input::url_input;
