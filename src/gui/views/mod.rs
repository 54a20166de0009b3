//! GUI views

pub mod download_view;
pub mod log_view;

// Re-export for convenience
pub use download_view::download_view;
pub use log_view::{log_scroll_id, log_view};
