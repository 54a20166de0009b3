//! Installing yt-dlp into the data directory when none is available

use crate::utils::error::EasyError;
use crate::utils::paths::AppPaths;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Base URL of the latest yt-dlp release assets
pub const RELEASE_BASE_URL: &str = "https://github.com/yt-dlp/yt-dlp/releases/latest/download";

/// Time allowed to reach the release server
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Time allowed for the whole binary download
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Release asset for this platform
pub fn release_asset_name() -> &'static str {
    if cfg!(windows) {
        "yt-dlp.exe"
    } else if cfg!(target_os = "macos") {
        "yt-dlp_macos"
    } else {
        "yt-dlp"
    }
}

pub fn release_asset_url() -> String {
    format!("{}/{}", RELEASE_BASE_URL, release_asset_name())
}

/// Return a usable yt-dlp, downloading the latest release if none is found
pub async fn ensure_ytdlp(paths: &AppPaths) -> Result<PathBuf, EasyError> {
    if let Some(found) = super::find_ytdlp(&paths.managed_ytdlp) {
        return Ok(found);
    }

    info!("Installing yt-dlp into {}", paths.managed_ytdlp.display());
    install_ytdlp(&release_asset_url(), &paths.managed_ytdlp).await?;
    Ok(paths.managed_ytdlp.clone())
}

fn release_client() -> Result<reqwest::Client, EasyError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(DOWNLOAD_TIMEOUT)
        .build()?)
}

/// Download `url` to `dest`, going through a `.part` file so that an
/// interrupted download never leaves a truncated binary behind
pub async fn install_ytdlp(url: &str, dest: &Path) -> Result<(), EasyError> {
    install_with(&release_client()?, url, dest).await
}

/// Same as [`install_ytdlp`] with a caller-provided client
pub async fn install_with(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<(), EasyError> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let response = client.get(url).send().await?.error_for_status()?;
    let part = dest.with_extension("part");
    let mut file = tokio::fs::File::create(&part).await?;

    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(&part).await;
                return Err(e.into());
            }
        };
        written += chunk.len() as u64;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    drop(file);

    if written == 0 {
        let _ = tokio::fs::remove_file(&part).await;
        return Err(EasyError::InstallFailed(format!("empty download from {}", url)));
    }

    make_executable(&part).await?;
    tokio::fs::rename(&part, dest).await?;
    info!("Installed yt-dlp ({} bytes)", written);
    Ok(())
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<(), EasyError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(|e| {
            warn!("chmod failed on {}: {}", path.display(), e);
            EasyError::InstallFailed(e.to_string())
        })
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<(), EasyError> {
    Ok(())
}
