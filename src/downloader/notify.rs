//! What happens after a job finishes: post hook and desktop notification

use crate::downloader::job::JobOutcome;
use crate::utils::config::Preferences;
use crate::ytdlp::hide_console_window;
use notify_rust::Notification;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Application name shown by the notification daemon
pub const APP_NAME: &str = "YT-DLP Made Easy";

/// Completion actions configured in preferences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionHooks {
    /// Shell command started (not awaited) after every job
    pub post_hook: Option<String>,
    pub notifications: bool,
}

impl From<&Preferences> for CompletionHooks {
    fn from(prefs: &Preferences) -> Self {
        Self {
            post_hook: prefs
                .post_hook
                .as_deref()
                .map(str::trim)
                .filter(|hook| !hook.is_empty())
                .map(String::from),
            notifications: prefs.notifications,
        }
    }
}

/// Title and body of the notification for a finished job
pub fn notification_text(label: &str, outcome: &JobOutcome) -> (String, String) {
    let title = match outcome {
        JobOutcome::Exited { success: true, .. } => "Download Complete",
        JobOutcome::Cancelled => "Download Cancelled",
        _ => "Download Failed",
    };
    let body = if label.is_empty() {
        "Finished".to_string()
    } else {
        label.to_string()
    };
    (title.to_string(), body)
}

/// Run the post hook and show a notification; failures are only logged
pub async fn run_completion_hooks(label: &str, outcome: &JobOutcome, hooks: &CompletionHooks) {
    if let Some(hook) = &hooks.post_hook {
        if let Err(e) = spawn_post_hook(hook) {
            warn!("Post hook `{}` failed to start: {}", hook, e);
        }
    }

    if hooks.notifications {
        let (title, body) = notification_text(label, outcome);
        let shown = tokio::task::spawn_blocking(move || {
            Notification::new()
                .appname(APP_NAME)
                .summary(&title)
                .body(&body)
                .show()
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .await;

        match shown {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("Notification not shown: {}", e),
            Err(e) => debug!("Notification task failed: {}", e),
        }
    }
}

fn spawn_post_hook(hook: &str) -> std::io::Result<()> {
    let mut command = if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.arg("/C").arg(hook);
        command
    } else {
        let mut command = Command::new("sh");
        command.arg("-c").arg(hook);
        command
    };
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    hide_console_window(&mut command);
    command.spawn().map(|_| ())
}
