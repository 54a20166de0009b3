//! Application initialization: backend runtime plus the window

use crate::backend::{BackendActor, BackendConfig};
use crate::downloader::notify::CompletionHooks;
use crate::gui::clipboard::CLIPBOARD_POLL_INTERVAL;
use crate::gui::{EasyApp, GuiFlags};
use crate::prompt::DialogConfirm;
use crate::utils::config::Preferences;
use crate::utils::paths::AppPaths;
use crate::ytdlp;
use anyhow::Result;
use iced::{Application, Settings};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Run the desktop application until the window closes
pub fn run(paths: AppPaths, prefs: Preferences) -> Result<()> {
    let runtime = Arc::new(tokio::runtime::Runtime::new()?);

    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    let (evt_tx, evt_rx) = mpsc::channel(1024);

    let config = BackendConfig {
        paths: paths.clone(),
        hooks: CompletionHooks::from(&prefs),
        clipboard_poll: Some(CLIPBOARD_POLL_INTERVAL),
        install_missing: true,
        release_url: ytdlp::release_asset_url(),
    };

    let actor = runtime.block_on(BackendActor::new(
        config,
        Arc::new(DialogConfirm),
        cmd_rx,
        evt_tx,
    ))?;
    runtime.spawn(actor.run());
    info!("Backend running; data in {}", paths.data_dir().display());

    let flags = GuiFlags {
        runtime,
        commands: cmd_tx,
        events: evt_rx,
        paths,
        prefs,
    };

    EasyApp::run(Settings {
        window: iced::window::Settings {
            size: iced::Size::new(860.0, 760.0),
            min_size: Some(iced::Size::new(820.0, 700.0)),
            ..Default::default()
        },
        antialiasing: true,
        ..Settings::with_flags(flags)
    })?;

    Ok(())
}
