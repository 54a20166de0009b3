//! YT-DLP Made Easy library

pub mod app;
pub mod backend;
pub mod downloader;
pub mod gui;
pub mod prompt;
pub mod utils;
pub mod ytdlp;

// Re-export main types for easier use
pub use backend::{BackendActor, BackendCommand, BackendConfig, BackendEvent};
pub use downloader::{DownloadOptions, JobEvent, JobOutcome, JobSpec, Quality};
pub use gui::{EasyApp, Message, View};
pub use utils::{AppPaths, EasyError, Preferences};
