//! Everything that talks to the yt-dlp binary itself

pub mod install;
pub mod locate;
pub mod probe;
pub mod update;

pub use install::{ensure_ytdlp, install_ytdlp, release_asset_url};
pub use locate::{find_ytdlp, is_executable};
pub use probe::expected_filename;
pub use update::{confirm_install, request_update, UPDATE_LABEL};

/// Keep Windows from flashing a console for every child process
pub(crate) fn hide_console_window(command: &mut tokio::process::Command) {
    #[cfg(windows)]
    {
        command.creation_flags(winapi::um::winbase::CREATE_NO_WINDOW);
    }
    #[cfg(not(windows))]
    {
        let _ = command;
    }
}
