//! Runs one yt-dlp process and streams its output line by line.
//!
//! stdout and stderr are read concurrently; each stream keeps its own order.
//! Every line is forwarded to the caller's channel and appended to the
//! activity log. The UI never waits on the process.

use crate::downloader::job::{JobEvent, JobOutcome, JobSpec};
use crate::downloader::log::ActivityLog;
use crate::ytdlp::hide_console_window;
use futures::stream::{self, StreamExt};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio_util::codec::{AnyDelimiterCodec, FramedRead};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Prefix of lines the app itself adds to a job's output
pub const ERROR_PREFIX: &str = "[ERROR]";

/// Run `spec` to completion (or until `cancel` fires).
///
/// Emits `Started`, then one `Line` per output line, then `Finished`.
pub async fn run_job<E>(
    spec: JobSpec,
    activity: Option<ActivityLog>,
    events: &mpsc::Sender<E>,
    cancel: CancellationToken,
) -> JobOutcome
where
    E: From<JobEvent> + Send + 'static,
{
    info!("Starting job {} ({})", spec.id, spec.label);
    emit(
        events,
        JobEvent::Started {
            job_id: spec.id.clone(),
            label: spec.label.clone(),
        },
    )
    .await;

    if let Some(log) = &activity {
        if let Err(e) = log.begin_session(&spec.label).await {
            warn!("Activity log unavailable: {}", e);
        }
    }

    let mut sink = LineSink {
        job_id: &spec.id,
        activity: activity.as_ref(),
        events,
    };

    let outcome = match spawn(&spec) {
        Ok(child) => drain(child, &mut sink, cancel).await,
        Err(e) => {
            sink.line(format!("{} {}", ERROR_PREFIX, e)).await;
            JobOutcome::FailedToStart(e.to_string())
        }
    };

    info!("Job {} {}", spec.id, outcome.describe());
    emit(
        events,
        JobEvent::Finished {
            job_id: spec.id.clone(),
            label: spec.label.clone(),
            outcome: outcome.clone(),
        },
    )
    .await;
    outcome
}

fn spawn(spec: &JobSpec) -> std::io::Result<Child> {
    let (program, args) = spec.argv.split_first().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command line")
    })?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    hide_console_window(&mut command);
    command.spawn()
}

/// Chunks end at `\n` or `\r`. Piped yt-dlp redraws its progress line with a
/// bare `\r`, so each redraw becomes a line of its own.
fn line_codec() -> AnyDelimiterCodec {
    AnyDelimiterCodec::new(b"\r\n".to_vec(), b"\n".to_vec())
}

/// Lossy decode; `None` for the empty chunk between `\r` and `\n`
fn decode_line(chunk: &[u8]) -> Option<String> {
    if chunk.is_empty() {
        return None;
    }
    Some(String::from_utf8_lossy(chunk).into_owned())
}

async fn drain<E>(
    mut child: Child,
    sink: &mut LineSink<'_, E>,
    cancel: CancellationToken,
) -> JobOutcome
where
    E: From<JobEvent> + Send + 'static,
{
    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        let _ = child.kill().await;
        return JobOutcome::FailedToStart("output pipes unavailable".to_string());
    };

    let mut lines = stream::select(
        FramedRead::new(stdout, line_codec()),
        FramedRead::new(stderr, line_codec()),
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Cancelling job {}", sink.job_id);
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill job {}: {}", sink.job_id, e);
                }
                sink.line(format!("{} cancelled by user", ERROR_PREFIX)).await;
                return JobOutcome::Cancelled;
            }
            next = lines.next() => match next {
                Some(Ok(chunk)) => {
                    if let Some(line) = decode_line(&chunk) {
                        sink.line(line).await;
                    }
                }
                Some(Err(e)) => {
                    warn!("Read error on job {}: {}", sink.job_id, e);
                    sink.line(format!("{} {}", ERROR_PREFIX, e)).await;
                }
                None => break,
            }
        }
    }

    match child.wait().await {
        Ok(status) => JobOutcome::Exited {
            code: status.code(),
            success: status.success(),
        },
        Err(e) => {
            sink.line(format!("{} {}", ERROR_PREFIX, e)).await;
            JobOutcome::Exited {
                code: None,
                success: false,
            }
        }
    }
}

async fn emit<E>(events: &mpsc::Sender<E>, event: JobEvent)
where
    E: From<JobEvent>,
{
    // receiver gone means nobody is watching; the job still runs to the end
    let _ = events.send(E::from(event)).await;
}

struct LineSink<'a, E> {
    job_id: &'a str,
    activity: Option<&'a ActivityLog>,
    events: &'a mpsc::Sender<E>,
}

impl<E> LineSink<'_, E>
where
    E: From<JobEvent>,
{
    async fn line(&mut self, line: String) {
        if let Some(log) = self.activity {
            if let Err(e) = log.append(&line).await {
                debug!("Activity log write failed: {}", e);
            }
        }
        emit(
            self.events,
            JobEvent::Line {
                job_id: self.job_id.to_string(),
                line,
            },
        )
        .await;
    }
}
