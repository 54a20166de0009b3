//! Yes/no questions asked before destructive actions

use async_trait::async_trait;
use rfd::{AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Asks the user to confirm an action.
///
/// Overwriting an existing file and replacing the yt-dlp binary both go
/// through this trait, so the gating logic does not depend on a display.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, title: &str, body: &str) -> bool;
}

/// Native yes/no dialog
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogConfirm;

#[async_trait]
impl Confirm for DialogConfirm {
    async fn confirm(&self, title: &str, body: &str) -> bool {
        let answer = AsyncMessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(title)
            .set_description(body)
            .set_buttons(MessageButtons::YesNo)
            .show()
            .await;
        matches!(answer, MessageDialogResult::Yes | MessageDialogResult::Ok)
    }
}

/// Answers every question the same way and counts how often it was asked.
/// Used by the headless mode, where the command-line flags are the answer.
#[derive(Debug, Default)]
pub struct FixedAnswer {
    answer: bool,
    asked: AtomicUsize,
}

impl FixedAnswer {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    /// Number of questions asked so far
    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Confirm for FixedAnswer {
    async fn confirm(&self, _title: &str, _body: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}
