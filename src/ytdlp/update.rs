//! Self-update of the yt-dlp binary

use crate::downloader::job::JobSpec;
use crate::prompt::Confirm;
use std::path::Path;
use tracing::info;

/// Label used for update jobs in the log and notifications
pub const UPDATE_LABEL: &str = "yt-dlp update";

/// Build the `yt-dlp -U` job, but only once the user has said yes
pub async fn request_update(prompt: &dyn Confirm, exe: &Path) -> Option<JobSpec> {
    let body = format!(
        "Replace {} with the latest yt-dlp release?",
        exe.display()
    );
    if !prompt.confirm("Update yt-dlp", &body).await {
        info!("yt-dlp update declined");
        return None;
    }

    Some(JobSpec::new(
        UPDATE_LABEL,
        vec![exe.to_string_lossy().into_owned(), "-U".to_string()],
    ))
}

/// Ask before downloading a yt-dlp binary into `dest`
pub async fn confirm_install(prompt: &dyn Confirm, dest: &Path) -> bool {
    let body = format!(
        "yt-dlp was not found. Download the latest release to {}?",
        dest.display()
    );
    let confirmed = prompt.confirm("Install yt-dlp", &body).await;
    if !confirmed {
        info!("yt-dlp install declined");
    }
    confirmed
}
