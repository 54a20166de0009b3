use super::messages::{BackendCommand, BackendEvent};
use crate::downloader::job::{prepare_download, JobPlan, JobSpec};
use crate::downloader::log::ActivityLog;
use crate::downloader::notify::{run_completion_hooks, CompletionHooks};
use crate::downloader::options::DownloadOptions;
use crate::downloader::runner::run_job;
use crate::gui::clipboard::watch_clipboard;
use crate::prompt::Confirm;
use crate::utils::error::EasyError;
use crate::utils::paths::AppPaths;
use crate::ytdlp;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Startup settings for the backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub paths: AppPaths,
    pub hooks: CompletionHooks,
    /// `None` disables the clipboard watcher
    pub clipboard_poll: Option<Duration>,
    /// Download yt-dlp at startup when no usable binary is found
    pub install_missing: bool,
    /// Where a missing yt-dlp is downloaded from
    pub release_url: String,
}

pub struct BackendActor {
    receiver: mpsc::Receiver<BackendCommand>,
    sender: mpsc::Sender<BackendEvent>,

    config: BackendConfig,
    activity: ActivityLog,
    prompt: Arc<dyn Confirm>,

    exe: Option<PathBuf>,
    // results of lookups/installs running off the command loop
    resolved_tx: mpsc::Sender<Option<PathBuf>>,
    resolved_rx: mpsc::Receiver<Option<PathBuf>>,
    resolving: bool,
    // replaced after every CancelAll so new jobs start uncancelled
    cancel: CancellationToken,
}

impl BackendActor {
    pub async fn new(
        config: BackendConfig,
        prompt: Arc<dyn Confirm>,
        receiver: mpsc::Receiver<BackendCommand>,
        sender: mpsc::Sender<BackendEvent>,
    ) -> Result<Self> {
        let activity = ActivityLog::open(&config.paths.activity_log).await?;
        let (resolved_tx, resolved_rx) = mpsc::channel(4);

        Ok(Self {
            receiver,
            sender,
            config,
            activity,
            prompt,
            exe: None,
            resolved_tx,
            resolved_rx,
            resolving: false,
            cancel: CancellationToken::new(),
        })
    }

    pub async fn run(mut self) {
        info!("BackendActor started");

        if let Some(every) = self.config.clipboard_poll {
            tokio::spawn(watch_clipboard(self.sender.clone(), every));
        }

        let install = self.config.install_missing;
        self.resolve_downloader(install, false).await;

        loop {
            tokio::select! {
                // a finished lookup is applied before any command queued after it
                biased;

                Some(resolved) = self.resolved_rx.recv() => {
                    self.resolving = false;
                    if resolved.is_some() {
                        self.exe = resolved;
                    }
                }
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => {
                        if !self.handle(cmd).await {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        info!("BackendActor shutting down");
        self.cancel.cancel();
    }

    /// Returns `false` when the actor should stop
    async fn handle(&mut self, cmd: BackendCommand) -> bool {
        match cmd {
            BackendCommand::StartDownloads { urls, options } => {
                let Some(exe) = self.exe.clone() else {
                    self.send(BackendEvent::Error(EasyError::YtDlpNotFound.to_string()))
                        .await;
                    return true;
                };
                let jobs = self.jobs();
                tokio::spawn(async move { jobs.launch_downloads(exe, urls, options).await });
            }
            BackendCommand::UpdateDownloader => match self.exe.clone() {
                Some(exe) => {
                    let jobs = self.jobs();
                    tokio::spawn(async move { jobs.update(exe).await });
                }
                // nothing to update yet; offer an install instead
                None => self.resolve_downloader(true, true).await,
            },
            BackendCommand::CancelAll => {
                info!("Cancelling all running jobs");
                self.cancel.cancel();
                self.cancel = CancellationToken::new();
            }
            BackendCommand::Shutdown => return false,
        }
        true
    }

    /// Look for yt-dlp (and maybe install it) on a separate task
    async fn resolve_downloader(&mut self, install: bool, ask_first: bool) {
        if self.resolving {
            self.send(BackendEvent::Log("Still looking for yt-dlp".to_string()))
                .await;
            return;
        }
        self.resolving = true;

        let task = ResolveTask {
            paths: self.config.paths.clone(),
            release_url: self.config.release_url.clone(),
            install,
            ask_first,
            prompt: Arc::clone(&self.prompt),
            sender: self.sender.clone(),
            done: self.resolved_tx.clone(),
        };
        tokio::spawn(task.run());
    }

    fn jobs(&self) -> JobContext {
        JobContext {
            sender: self.sender.clone(),
            activity: self.activity.clone(),
            prompt: Arc::clone(&self.prompt),
            hooks: self.config.hooks.clone(),
            cancel: self.cancel.clone(),
        }
    }

    async fn send(&self, event: BackendEvent) {
        if self.sender.send(event).await.is_err() {
            warn!("GUI is gone; dropping backend event");
        }
    }
}

/// One lookup of the yt-dlp binary, with an optional install
struct ResolveTask {
    paths: AppPaths,
    release_url: String,
    install: bool,
    ask_first: bool,
    prompt: Arc<dyn Confirm>,
    sender: mpsc::Sender<BackendEvent>,
    done: mpsc::Sender<Option<PathBuf>>,
}

impl ResolveTask {
    async fn run(self) {
        let event = match self.locate_or_install().await {
            Ok(Some(exe)) => BackendEvent::DownloaderReady(exe),
            Ok(None) => BackendEvent::Log("yt-dlp install cancelled".to_string()),
            Err(e) => {
                error!("yt-dlp unavailable: {}", e);
                BackendEvent::DownloaderMissing(e.to_string())
            }
        };

        let exe = match &event {
            BackendEvent::DownloaderReady(exe) => Some(exe.clone()),
            _ => None,
        };
        let _ = self.done.send(exe).await;
        let _ = self.sender.send(event).await;
    }

    /// `Ok(None)` when the user declined the install
    async fn locate_or_install(&self) -> Result<Option<PathBuf>, EasyError> {
        let managed = &self.paths.managed_ytdlp;
        if let Some(exe) = ytdlp::find_ytdlp(managed) {
            return Ok(Some(exe));
        }
        if !self.install {
            return Err(EasyError::YtDlpNotFound);
        }
        if self.ask_first && !ytdlp::confirm_install(self.prompt.as_ref(), managed).await {
            return Ok(None);
        }

        info!("Installing yt-dlp into {}", managed.display());
        ytdlp::install_ytdlp(&self.release_url, managed).await?;
        Ok(Some(managed.clone()))
    }
}

/// Everything a spawned job task needs, detached from the actor
#[derive(Clone)]
struct JobContext {
    sender: mpsc::Sender<BackendEvent>,
    activity: ActivityLog,
    prompt: Arc<dyn Confirm>,
    hooks: CompletionHooks,
    cancel: CancellationToken,
}

impl JobContext {
    /// Prepare URLs one at a time (each may ask a question), run them in parallel
    async fn launch_downloads(self, exe: PathBuf, urls: Vec<String>, options: DownloadOptions) {
        for url in urls {
            if self.cancel.is_cancelled() {
                break;
            }
            match prepare_download(&exe, &url, &options, self.prompt.as_ref()).await {
                JobPlan::Launch(spec) => {
                    let jobs = self.clone();
                    tokio::spawn(async move { jobs.run(spec).await });
                }
                JobPlan::Skipped { url } => {
                    let _ = self.sender.send(BackendEvent::Log(format!("Skipped {}", url))).await;
                }
            }
        }
    }

    async fn update(self, exe: PathBuf) {
        match ytdlp::request_update(self.prompt.as_ref(), &exe).await {
            Some(spec) => self.run(spec).await,
            None => {
                let _ = self
                    .sender
                    .send(BackendEvent::Log("yt-dlp update cancelled".to_string()))
                    .await;
            }
        }
    }

    async fn run(&self, spec: JobSpec) {
        let label = spec.label.clone();
        let outcome = run_job(
            spec,
            Some(self.activity.clone()),
            &self.sender,
            self.cancel.clone(),
        )
        .await;
        run_completion_hooks(&label, &outcome, &self.hooks).await;
    }
}
