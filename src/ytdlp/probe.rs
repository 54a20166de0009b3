//! Asking yt-dlp which file a URL would produce

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Expected output path for `url` inside `folder`, without downloading.
/// Any failure means "unknown".
pub async fn expected_filename(exe: &Path, url: &str, folder: &Path) -> Option<PathBuf> {
    let mut command = Command::new(exe);
    command
        .args(["--no-print-traffic", "--print", "filename", url])
        .stdin(Stdio::null())
        .stderr(Stdio::null());
    super::hide_console_window(&mut command);

    let output = match command.output().await {
        Ok(output) => output,
        Err(e) => {
            debug!("Filename probe for {} failed: {}", url, e);
            return None;
        }
    };
    if !output.status.success() {
        debug!("Filename probe for {} exited with {}", url, output.status);
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let name = stdout.lines().next()?.trim();
    if name.is_empty() {
        return None;
    }
    Some(folder.join(name))
}
