#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tokio::sync::mpsc;
use ytdlp_easy::backend::{BackendActor, BackendCommand, BackendConfig, BackendEvent};
use ytdlp_easy::downloader::{CompletionHooks, DownloadOptions, JobEvent, JobOutcome};
use ytdlp_easy::prompt::FixedAnswer;
use ytdlp_easy::utils::AppPaths;

/// Stands in for yt-dlp: answers the filename probe, the update flag and downloads
const FAKE_YTDLP: &str = r#"#!/bin/sh
case "$*" in
  *--print*) echo "fresh.mp4" ;;
  -U) echo "yt-dlp is up to date" ;;
  *) echo "[download] $1"; echo "[download] 100%" ;;
esac
"#;

fn install_fake(paths: &AppPaths) {
    paths.ensure_dirs().unwrap();
    std::fs::write(&paths.managed_ytdlp, FAKE_YTDLP).unwrap();
    std::fs::set_permissions(&paths.managed_ytdlp, std::fs::Permissions::from_mode(0o755))
        .unwrap();
}

struct Harness {
    _temp: TempDir,
    paths: AppPaths,
    commands: mpsc::Sender<BackendCommand>,
    events: mpsc::Receiver<BackendEvent>,
}

fn config(paths: &AppPaths) -> BackendConfig {
    BackendConfig {
        paths: paths.clone(),
        hooks: CompletionHooks::default(),
        clipboard_poll: None,
        install_missing: false,
        release_url: "http://127.0.0.1:9/yt-dlp".to_string(),
    }
}

async fn spawn_actor(temp: TempDir, config: BackendConfig, prompt: Arc<FixedAnswer>) -> Harness {
    let paths = config.paths.clone();
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (evt_tx, evt_rx) = mpsc::channel(256);
    let actor = BackendActor::new(config, prompt, cmd_rx, evt_tx)
        .await
        .unwrap();
    tokio::spawn(actor.run());

    Harness {
        _temp: temp,
        paths,
        commands: cmd_tx,
        events: evt_rx,
    }
}

async fn start(answer: bool, with_binary: bool) -> Harness {
    let temp = tempdir().unwrap();
    let paths = AppPaths::new(temp.path().join("data"));
    if with_binary {
        install_fake(&paths);
    }
    let config = config(&paths);
    spawn_actor(temp, config, Arc::new(FixedAnswer::new(answer))).await
}

impl Harness {
    async fn next(&mut self) -> BackendEvent {
        tokio::time::timeout(Duration::from_secs(10), self.events.recv())
            .await
            .expect("backend event in time")
            .expect("backend still running")
    }

    /// Collect events until `count` jobs have finished
    async fn until_finished(&mut self, count: usize) -> Vec<BackendEvent> {
        let mut seen = Vec::new();
        let mut finished = 0;
        while finished < count {
            let event = self.next().await;
            if matches!(event, BackendEvent::Job(JobEvent::Finished { .. })) {
                finished += 1;
            }
            seen.push(event);
        }
        seen
    }
}

fn options_in(folder: &Path) -> DownloadOptions {
    DownloadOptions {
        folder: folder.to_string_lossy().into_owned(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_reports_managed_downloader_on_start() {
    let mut harness = start(true, true).await;

    match harness.next().await {
        BackendEvent::DownloaderReady(path) => assert_eq!(path, harness.paths.managed_ytdlp),
        other => panic!("expected DownloaderReady, got {:?}", other),
    }
}

#[tokio::test]
async fn test_downloads_stream_lines_and_finish() {
    let mut harness = start(true, true).await;
    assert!(matches!(harness.next().await, BackendEvent::DownloaderReady(_)));

    let out = tempdir().unwrap();
    harness
        .commands
        .send(BackendCommand::StartDownloads {
            urls: vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ],
            options: options_in(out.path()),
        })
        .await
        .unwrap();

    let events = harness.until_finished(2).await;

    let lines: Vec<&str> = events
        .iter()
        .filter_map(|event| match event {
            BackendEvent::Job(JobEvent::Line { line, .. }) => Some(line.as_str()),
            _ => None,
        })
        .collect();
    assert!(lines.contains(&"[download] https://example.com/a"));
    assert!(lines.contains(&"[download] https://example.com/b"));

    for event in &events {
        if let BackendEvent::Job(JobEvent::Finished { outcome, .. }) = event {
            assert!(outcome.is_success(), "job ended with {:?}", outcome);
        }
    }

    let log = std::fs::read_to_string(&harness.paths.activity_log).unwrap();
    assert!(log.contains("[download] https://example.com/a"));
}

#[tokio::test]
async fn test_existing_file_declined_is_skipped() {
    let mut harness = start(false, true).await;
    assert!(matches!(harness.next().await, BackendEvent::DownloaderReady(_)));

    let out = tempdir().unwrap();
    std::fs::write(out.path().join("fresh.mp4"), b"old").unwrap();
    harness
        .commands
        .send(BackendCommand::StartDownloads {
            urls: vec!["https://example.com/a".to_string()],
            options: options_in(out.path()),
        })
        .await
        .unwrap();

    match harness.next().await {
        BackendEvent::Log(line) => assert_eq!(line, "Skipped https://example.com/a"),
        other => panic!("expected skip notice, got {:?}", other),
    }
    assert_eq!(std::fs::read(out.path().join("fresh.mp4")).unwrap(), b"old");
}

#[tokio::test]
async fn test_update_declined_runs_nothing() {
    let mut harness = start(false, true).await;
    assert!(matches!(harness.next().await, BackendEvent::DownloaderReady(_)));

    harness
        .commands
        .send(BackendCommand::UpdateDownloader)
        .await
        .unwrap();

    match harness.next().await {
        BackendEvent::Log(line) => assert_eq!(line, "yt-dlp update cancelled"),
        other => panic!("expected cancellation notice, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_confirmed_runs_self_update() {
    let mut harness = start(true, true).await;
    assert!(matches!(harness.next().await, BackendEvent::DownloaderReady(_)));

    harness
        .commands
        .send(BackendCommand::UpdateDownloader)
        .await
        .unwrap();

    let events = harness.until_finished(1).await;
    assert!(events.iter().any(|event| matches!(
        event,
        BackendEvent::Job(JobEvent::Line { line, .. }) if line == "yt-dlp is up to date"
    )));
}

#[tokio::test]
async fn test_downloads_refused_without_binary() {
    let mut harness = start(true, false).await;

    // the host may have a yt-dlp on PATH; only check the missing case
    if let BackendEvent::DownloaderMissing(_) = harness.next().await {
        harness
            .commands
            .send(BackendCommand::StartDownloads {
                urls: vec!["https://example.com/a".to_string()],
                options: DownloadOptions::default(),
            })
            .await
            .unwrap();
        assert!(matches!(harness.next().await, BackendEvent::Error(_)));
    }
}

#[tokio::test]
async fn test_cancel_all_stops_running_jobs() {
    let temp = tempdir().unwrap();
    let paths = AppPaths::new(temp.path().join("data"));
    paths.ensure_dirs().unwrap();
    std::fs::write(
        &paths.managed_ytdlp,
        "#!/bin/sh\ncase \"$*\" in *--print*) exit 1 ;; esac\necho started\nsleep 30\n",
    )
    .unwrap();
    std::fs::set_permissions(&paths.managed_ytdlp, std::fs::Permissions::from_mode(0o755))
        .unwrap();

    let config = config(&paths);
    let mut harness = spawn_actor(temp, config, Arc::new(FixedAnswer::new(true))).await;
    assert!(matches!(harness.next().await, BackendEvent::DownloaderReady(_)));

    let out = tempdir().unwrap();
    harness
        .commands
        .send(BackendCommand::StartDownloads {
            urls: vec!["https://example.com/slow".to_string()],
            options: options_in(out.path()),
        })
        .await
        .unwrap();

    loop {
        if let BackendEvent::Job(JobEvent::Line { line, .. }) = harness.next().await {
            if line == "started" {
                break;
            }
        }
    }
    harness.commands.send(BackendCommand::CancelAll).await.unwrap();

    let events = harness.until_finished(1).await;
    match events.last() {
        Some(BackendEvent::Job(JobEvent::Finished { outcome, .. })) => {
            assert_eq!(outcome, &JobOutcome::Cancelled)
        }
        other => panic!("expected Finished, got {:?}", other),
    }
}

#[tokio::test]
async fn test_install_from_update_needs_confirmation() {
    // nothing listens on a port we just released, so any install fails fast
    let refused = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let release_url = format!("http://{}/yt-dlp", refused.local_addr().unwrap());
    drop(refused);

    let temp = tempdir().unwrap();
    let paths = AppPaths::new(temp.path().join("data"));
    paths.ensure_dirs().unwrap();
    let prompt = Arc::new(FixedAnswer::new(false));
    let config = BackendConfig {
        install_missing: true,
        release_url,
        ..config(&paths)
    };
    let mut harness = spawn_actor(temp, config, Arc::clone(&prompt)).await;

    // the host may have a yt-dlp on PATH; only check the missing case
    let BackendEvent::DownloaderMissing(_) = harness.next().await else {
        return;
    };
    assert_eq!(prompt.asked(), 0, "startup install does not ask");

    harness
        .commands
        .send(BackendCommand::UpdateDownloader)
        .await
        .unwrap();

    match harness.next().await {
        BackendEvent::Log(line) => assert_eq!(line, "yt-dlp install cancelled"),
        other => panic!("expected install cancellation, got {:?}", other),
    }
    assert_eq!(prompt.asked(), 1);
    assert!(!harness.paths.managed_ytdlp.exists());
    assert!(!harness.paths.managed_ytdlp.with_extension("part").exists());
}

#[tokio::test]
async fn test_commands_are_served_while_install_stalls() {
    // accepts connections and never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let release_url = format!("http://{}/yt-dlp", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let temp = tempdir().unwrap();
    let paths = AppPaths::new(temp.path().join("data"));
    paths.ensure_dirs().unwrap();
    let config = BackendConfig {
        install_missing: true,
        release_url,
        ..config(&paths)
    };
    let mut harness = spawn_actor(temp, config, Arc::new(FixedAnswer::new(false))).await;

    harness
        .commands
        .send(BackendCommand::UpdateDownloader)
        .await
        .unwrap();

    match harness.next().await {
        BackendEvent::Log(line) => assert_eq!(line, "Still looking for yt-dlp"),
        // the host has a yt-dlp on PATH, so no install started
        BackendEvent::DownloaderReady(_) => match harness.next().await {
            BackendEvent::Log(line) => assert_eq!(line, "yt-dlp update cancelled"),
            other => panic!("expected update cancellation, got {:?}", other),
        },
        other => panic!("expected a reply while installing, got {:?}", other),
    }

    harness.commands.send(BackendCommand::Shutdown).await.unwrap();
    server.abort();
}
