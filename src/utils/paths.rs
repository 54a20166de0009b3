//! Application directories
//!
//! Everything the app owns lives in one per-user data directory:
//! - Windows: %LOCALAPPDATA%\yt-dlp-made-easy
//! - Linux: $XDG_DATA_HOME/yt-dlp-made-easy (or ~/.local/share/yt-dlp-made-easy)
//! - macOS: ~/Library/Application Support/yt-dlp-made-easy

use std::io;
use std::path::{Path, PathBuf};

/// Name of the per-user data directory
pub const APP_DIR_NAME: &str = "yt-dlp-made-easy";

/// File name of the managed yt-dlp binary on this platform
pub fn ytdlp_file_name() -> &'static str {
    if cfg!(windows) {
        "yt-dlp.exe"
    } else {
        "yt-dlp"
    }
}

/// Returns the default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Locations of every file the application reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    /// yt-dlp binary installed and updated by the app
    pub managed_ytdlp: PathBuf,
    /// Plain-text copy of every line the downloader printed
    pub activity_log: PathBuf,
    pub prefs_file: PathBuf,
    /// Reserved for yt-dlp plugins dropped in by the user
    pub plugins_dir: PathBuf,
}

impl AppPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            managed_ytdlp: data_dir.join(ytdlp_file_name()),
            activity_log: data_dir.join("activity.log"),
            prefs_file: data_dir.join("prefs.json"),
            plugins_dir: data_dir.join("plugins"),
            data_dir,
        }
    }

    /// Paths rooted at [`default_data_dir`]
    pub fn default_location() -> Self {
        Self::new(default_data_dir())
    }

    /// Create the data and plugin directories if they are missing
    pub fn ensure_dirs(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.plugins_dir)?;
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
