//! Finding a usable yt-dlp binary

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Find yt-dlp with priority:
/// 1. The copy managed by the app in its data directory
/// 2. Next to our own executable (portable installs)
/// 3. System PATH
/// 4. Common installation paths
pub fn find_ytdlp(managed: &Path) -> Option<PathBuf> {
    if is_executable(managed) {
        info!("Using managed yt-dlp: {}", managed.display());
        return Some(managed.to_path_buf());
    }

    if let Some(sibling) = find_next_to_exe() {
        info!("Using yt-dlp next to executable: {}", sibling.display());
        return Some(sibling);
    }

    if let Ok(system) = which::which("yt-dlp") {
        info!("Using system yt-dlp: {}", system.display());
        return Some(system);
    }

    if let Some(common) = find_in_common_paths() {
        info!("Using yt-dlp from common path: {}", common.display());
        return Some(common);
    }

    warn!("yt-dlp not found anywhere");
    None
}

fn find_next_to_exe() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let candidate = exe_path
        .parent()?
        .join(crate::utils::paths::ytdlp_file_name());
    debug!("Checking {}", candidate.display());
    is_executable(&candidate).then_some(candidate)
}

fn find_in_common_paths() -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = [
        "/opt/homebrew/bin/yt-dlp",
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
        "/Library/Frameworks/Python.framework/Versions/Current/bin/yt-dlp",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();

    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".local").join("bin").join("yt-dlp"));
    }

    candidates.into_iter().find(|path| is_executable(path))
}

/// Whether `path` is a file we can execute
pub fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}
