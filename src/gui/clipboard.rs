//! Clipboard access and the URL watcher

use crate::backend::messages::BackendEvent;
use arboard::Clipboard;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// How often the clipboard is checked for a new URL
pub const CLIPBOARD_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Get clipboard content
pub fn get_clipboard_content() -> Result<String, String> {
    let mut clipboard =
        Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;

    clipboard
        .get_text()
        .map_err(|e| format!("Failed to read clipboard: {}", e))
}

/// Decides which clipboard contents get pasted into the URL box.
///
/// Only text that looks like a URL is taken, and never the same text twice
/// in a row, so a URL the user has since edited away is not pasted back.
#[derive(Debug, Default, Clone)]
pub struct ClipboardWatcher {
    last: String,
}

impl ClipboardWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the URL to paste, if `clip` is new
    pub fn observe(&mut self, clip: &str) -> Option<String> {
        let clip = clip.trim();
        if !clip.starts_with("http") || clip == self.last {
            return None;
        }
        self.last = clip.to_string();
        Some(self.last.clone())
    }

    pub fn last(&self) -> &str {
        &self.last
    }
}

/// Poll the clipboard until the event receiver goes away.
/// Read errors (locked clipboard, no display) are ignored.
pub async fn watch_clipboard(sender: mpsc::Sender<BackendEvent>, every: Duration) {
    info!("Clipboard watcher started ({:?})", every);
    let mut watcher = ClipboardWatcher::new();
    let mut ticker = tokio::time::interval(every);

    while !sender.is_closed() {
        ticker.tick().await;

        let clip = match tokio::task::spawn_blocking(get_clipboard_content).await {
            Ok(Ok(clip)) => clip,
            Ok(Err(e)) => {
                debug!("{}", e);
                continue;
            }
            Err(e) => {
                debug!("Clipboard task failed: {}", e);
                continue;
            }
        };

        if let Some(url) = watcher.observe(&clip) {
            if sender.send(BackendEvent::ClipboardUrl(url)).await.is_err() {
                break;
            }
        }
    }
    debug!("Clipboard watcher stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_url_is_pasted_once() {
        let mut watcher = ClipboardWatcher::new();
        assert_eq!(
            watcher.observe("https://youtu.be/abc"),
            Some("https://youtu.be/abc".to_string())
        );
        assert_eq!(watcher.observe("https://youtu.be/abc"), None);
        assert_eq!(watcher.observe("https://youtu.be/abc\n"), None);
    }

    #[test]
    fn test_non_urls_are_ignored_and_do_not_reset() {
        let mut watcher = ClipboardWatcher::new();
        watcher.observe("https://youtu.be/abc");
        assert_eq!(watcher.observe("some notes"), None);
        assert_eq!(watcher.observe("https://youtu.be/abc"), None);
        assert_eq!(watcher.last(), "https://youtu.be/abc");
    }

    #[test]
    fn test_new_url_replaces_last() {
        let mut watcher = ClipboardWatcher::new();
        watcher.observe("https://youtu.be/abc");
        assert_eq!(
            watcher.observe("http://example.com/v"),
            Some("http://example.com/v".to_string())
        );
    }

    #[tokio::test]
    async fn test_watcher_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        tokio::time::timeout(
            Duration::from_secs(5),
            watch_clipboard(tx, Duration::from_millis(10)),
        )
        .await
        .expect("watcher should exit");
    }
}
