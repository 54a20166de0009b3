//! Error handling for YT-DLP Made Easy

use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error)]
pub enum EasyError {
    #[error("yt-dlp not found. Use the Update button or install yt-dlp")]
    YtDlpNotFound,

    #[error("Failed to install yt-dlp: {0}")]
    InstallFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
