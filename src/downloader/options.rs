//! Download form state and yt-dlp command line construction

use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Subtitle languages offered in the form
pub const SUBTITLE_LANGUAGES: [&str; 3] = ["en", "es", "fr"];

/// Video quality cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Quality {
    #[default]
    #[serde(rename = "best")]
    Best,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
}

impl Quality {
    pub const ALL: [Quality; 4] = [Quality::Best, Quality::P1080, Quality::P720, Quality::P480];

    /// Maximum frame height, `None` for best available
    pub fn max_height(&self) -> Option<u32> {
        match self {
            Quality::Best => None,
            Quality::P1080 => Some(1080),
            Quality::P720 => Some(720),
            Quality::P480 => Some(480),
        }
    }

    /// Value passed to `-f`
    pub fn format_selector(&self) -> String {
        match self.max_height() {
            None => "bv*+ba/best".to_string(),
            Some(height) => format!("bestvideo[height<={}]+bestaudio/best", height),
        }
    }

    /// Parse the labels shown in the UI ("Best", "720p") or a bare height ("720")
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("best") {
            return Some(Quality::Best);
        }
        match value.trim_end_matches(['p', 'P']) {
            "1080" => Some(Quality::P1080),
            "720" => Some(Quality::P720),
            "480" => Some(Quality::P480),
            _ => None,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_height() {
            None => write!(f, "Best"),
            Some(height) => write!(f, "{}p", height),
        }
    }
}

/// Options collected from the download form.
///
/// Text fields are kept exactly as typed; they are trimmed when the command
/// line is built and an empty value means "not set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadOptions {
    /// Destination folder, empty for the current working directory
    pub folder: String,
    pub quality: Quality,
    pub audio_only: bool,
    pub subtitle_language: Option<String>,
    /// Remove all SponsorBlock segments
    pub sponsorblock: bool,
    /// yt-dlp rate syntax, e.g. `500K`
    pub rate_limit: String,
    pub proxy: String,
    /// yt-dlp output template, e.g. `%(title)s.%(ext)s`
    pub output_template: String,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            folder: String::new(),
            quality: Quality::Best,
            audio_only: false,
            subtitle_language: None,
            sponsorblock: false,
            rate_limit: String::new(),
            proxy: String::new(),
            output_template: String::new(),
        }
    }
}

impl DownloadOptions {
    /// Absolute destination folder
    pub fn destination(&self) -> PathBuf {
        let folder = self.folder.trim();
        if folder.is_empty() {
            return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        }
        let path = Path::new(folder);
        match path.absolutize() {
            Ok(absolute) => absolute.into_owned(),
            Err(_) => path.to_path_buf(),
        }
    }

    /// Full argument vector for one URL, starting with the executable
    pub fn to_args(&self, exe: &Path, url: &str) -> Vec<String> {
        let mut args = vec![
            exe.to_string_lossy().into_owned(),
            url.to_string(),
            "-P".to_string(),
            self.destination().to_string_lossy().into_owned(),
        ];

        if self.audio_only {
            args.extend(["-x", "--audio-format", "mp3"].map(String::from));
        } else {
            args.push("-f".to_string());
            args.push(self.quality.format_selector());
        }

        if let Some(lang) = non_empty(self.subtitle_language.as_deref().unwrap_or("")) {
            args.push("--write-subs".to_string());
            args.push(format!("--sub-lang={}", lang));
        }
        if self.sponsorblock {
            args.extend(["--sponsorblock-remove", "all"].map(String::from));
        }

        if let Some(rate) = non_empty(&self.rate_limit) {
            args.push("--limit-rate".to_string());
            args.push(rate.to_string());
        }
        if let Some(proxy) = non_empty(&self.proxy) {
            args.push("--proxy".to_string());
            args.push(proxy.to_string());
        }

        if let Some(template) = non_empty(&self.output_template) {
            args.push("-o".to_string());
            args.push(template.to_string());
        }

        args
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Split the URL box into one URL per non-blank line
pub fn parse_urls(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
