#![cfg(unix)]

use std::time::Duration;
use tempfile::tempdir;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use ytdlp_easy::downloader::runner::ERROR_PREFIX;
use ytdlp_easy::downloader::{run_job, ActivityLog, JobEvent, JobOutcome, JobSpec};

fn shell(script: &str) -> JobSpec {
    JobSpec::new(
        "test job",
        vec!["sh".to_string(), "-c".to_string(), script.to_string()],
    )
}

/// Run a job to the end and collect every event it produced
async fn collect(spec: JobSpec, activity: Option<ActivityLog>) -> (JobOutcome, Vec<JobEvent>) {
    let (tx, mut rx) = mpsc::channel::<JobEvent>(1024);
    let outcome = run_job(spec, activity, &tx, CancellationToken::new()).await;
    drop(tx);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    (outcome, events)
}

fn lines(events: &[JobEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            JobEvent::Line { line, .. } => Some(line.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_stdout_lines_arrive_in_order() {
    let (outcome, events) = collect(shell("for i in 1 2 3 4 5; do echo line $i; done"), None).await;

    assert!(outcome.is_success());
    assert_eq!(
        lines(&events),
        vec!["line 1", "line 2", "line 3", "line 4", "line 5"]
    );
    assert!(matches!(events.first(), Some(JobEvent::Started { .. })));
    assert!(matches!(events.last(), Some(JobEvent::Finished { .. })));
}

#[tokio::test]
async fn test_stderr_is_captured_too() {
    let (outcome, events) = collect(shell("echo out; echo err >&2; exit 3"), None).await;

    assert_eq!(
        outcome,
        JobOutcome::Exited {
            code: Some(3),
            success: false
        }
    );
    let mut got = lines(&events);
    got.sort();
    assert_eq!(got, vec!["err", "out"]);
}

#[tokio::test]
async fn test_carriage_returns_and_bad_utf8_are_tolerated() {
    let (_, events) = collect(shell("printf 'progress\\r\\n'; printf 'caf\\351\\n'"), None).await;

    let got = lines(&events);
    assert_eq!(got[0], "progress");
    assert!(got[1].starts_with("caf"));
}

#[tokio::test]
async fn test_missing_program_reports_error_line() {
    let spec = JobSpec::new("ghost", vec!["/no/such/yt-dlp".to_string()]);
    let (outcome, events) = collect(spec, None).await;

    assert!(matches!(outcome, JobOutcome::FailedToStart(_)));
    let got = lines(&events);
    assert_eq!(got.len(), 1);
    assert!(got[0].starts_with(ERROR_PREFIX));
    match events.last() {
        Some(JobEvent::Finished { outcome, .. }) => {
            assert!(matches!(outcome, JobOutcome::FailedToStart(_)))
        }
        other => panic!("expected Finished, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancel_kills_the_process() {
    let (tx, mut rx) = mpsc::channel::<JobEvent>(1024);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(10),
        run_job(shell("echo started; sleep 30"), None, &tx, cancel),
    )
    .await
    .expect("cancelled job should end quickly");
    drop(tx);

    assert_eq!(outcome, JobOutcome::Cancelled);
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    let got = lines(&events);
    assert_eq!(got.first().map(String::as_str), Some("started"));
    assert!(got.last().is_some_and(|line| line.starts_with(ERROR_PREFIX)));
}

#[tokio::test]
async fn test_output_is_appended_to_activity_log() {
    let temp = tempdir().unwrap();
    let log_path = temp.path().join("activity.log");
    let activity = tokio_test::assert_ok!(ActivityLog::open(&log_path).await);

    collect(shell("echo first"), Some(activity.clone())).await;
    collect(shell("echo second"), Some(activity)).await;

    let content = std::fs::read_to_string(&log_path).unwrap();
    let first = content.find("first").expect("first job logged");
    let second = content.find("second").expect("second job logged");
    assert!(first < second);
    assert_eq!(content.matches("| test job =====").count(), 2);
}

#[tokio::test]
async fn test_progress_redraws_stream_as_separate_lines() {
    let script = r"printf '\r[download]  10%%'; sleep 1; printf '\r[download]  50%%'; sleep 2; printf '\r[download] 100%%\n'";
    let (tx, mut rx) = mpsc::channel::<JobEvent>(1024);

    let job = tokio::spawn(async move {
        run_job(shell(script), None, &tx, CancellationToken::new()).await
    });

    let started = std::time::Instant::now();
    let mut arrivals = Vec::new();
    let mut finished_at = None;
    while let Some(event) = rx.recv().await {
        match event {
            JobEvent::Line { line, .. } => arrivals.push((line, started.elapsed())),
            JobEvent::Finished { .. } => finished_at = Some(started.elapsed()),
            JobEvent::Started { .. } => {}
        }
    }
    assert!(job.await.unwrap().is_success());

    let got: Vec<&str> = arrivals.iter().map(|(line, _)| line.as_str()).collect();
    assert_eq!(got, vec!["[download]  10%", "[download]  50%", "[download] 100%"]);

    let finished_at = finished_at.expect("job finished");
    let first_update_at = arrivals[0].1;
    assert!(
        finished_at - first_update_at >= Duration::from_secs(1),
        "first update arrived at {:?}, job finished at {:?}",
        first_update_at,
        finished_at
    );
}
