use crate::downloader::job::JobEvent;
use crate::downloader::options::DownloadOptions;
use std::path::PathBuf;

/// Commands sent from GUI to Backend
#[derive(Debug, Clone)]
pub enum BackendCommand {
    /// One job per URL, with the overwrite check first
    StartDownloads {
        urls: Vec<String>,
        options: DownloadOptions,
    },
    /// Ask for confirmation, then run `yt-dlp -U`
    UpdateDownloader,
    /// Kill every running job
    CancelAll,
    Shutdown,
}

/// Events sent from Backend to GUI
#[derive(Debug, Clone)]
pub enum BackendEvent {
    DownloaderReady(PathBuf),
    DownloaderMissing(String),

    Job(JobEvent),

    /// A line produced by the app rather than by yt-dlp
    Log(String),

    ClipboardUrl(String),

    Error(String),
}

impl From<JobEvent> for BackendEvent {
    fn from(event: JobEvent) -> Self {
        BackendEvent::Job(event)
    }
}
