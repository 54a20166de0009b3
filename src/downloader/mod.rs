//! Download jobs: options, command lines, process runner and logs

pub mod job;
pub mod log;
pub mod notify;
pub mod options;
pub mod runner;

// Re-export for convenience
pub use job::{prepare_download, JobEvent, JobOutcome, JobPlan, JobSpec};
pub use log::{ActivityLog, LogBuffer};
pub use notify::{run_completion_hooks, CompletionHooks};
pub use options::{parse_urls, DownloadOptions, Quality};
pub use runner::run_job;
