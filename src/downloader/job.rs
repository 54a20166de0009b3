//! Jobs: one yt-dlp process each

use crate::downloader::options::DownloadOptions;
use crate::prompt::Confirm;
use crate::ytdlp;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// A command line ready to be spawned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub id: String,
    /// Shown in the status bar and in notifications (usually the URL)
    pub label: String,
    /// Program followed by its arguments
    pub argv: Vec<String>,
}

impl JobSpec {
    pub fn new(label: impl Into<String>, argv: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            argv,
        }
    }
}

/// How a job ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Exited { code: Option<i32>, success: bool },
    Cancelled,
    FailedToStart(String),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Exited { success: true, .. })
    }

    pub fn describe(&self) -> String {
        match self {
            JobOutcome::Exited { success: true, .. } => "finished".to_string(),
            JobOutcome::Exited {
                code: Some(code), ..
            } => format!("failed with exit code {}", code),
            JobOutcome::Exited { code: None, .. } => "terminated by a signal".to_string(),
            JobOutcome::Cancelled => "cancelled".to_string(),
            JobOutcome::FailedToStart(e) => format!("could not start: {}", e),
        }
    }
}

/// Progress of a running job, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Started {
        job_id: String,
        label: String,
    },
    Line {
        job_id: String,
        line: String,
    },
    Finished {
        job_id: String,
        label: String,
        outcome: JobOutcome,
    },
}

/// What to do with one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPlan {
    Launch(JobSpec),
    /// The target file exists and the user chose to keep it
    Skipped { url: String },
}

/// Build the job for `url`, asking before overwriting a file that already exists
pub async fn prepare_download(
    exe: &Path,
    url: &str,
    options: &DownloadOptions,
    prompt: &dyn Confirm,
) -> JobPlan {
    let folder = options.destination();

    if let Some(expected) = ytdlp::expected_filename(exe, url, &folder).await {
        if tokio::fs::try_exists(&expected).await.unwrap_or(false) {
            let body = format!(
                "The file already exists:\n\n{}\n\nReplace it?",
                expected.display()
            );
            if !prompt.confirm("File Exists", &body).await {
                info!("Keeping existing {}", expected.display());
                return JobPlan::Skipped {
                    url: url.to_string(),
                };
            }
        }
    }

    JobPlan::Launch(JobSpec::new(url, options.to_args(exe, url)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::FixedAnswer;

    #[test]
    fn test_job_ids_are_unique() {
        let a = JobSpec::new("a", vec!["yt-dlp".to_string()]);
        let b = JobSpec::new("a", vec!["yt-dlp".to_string()]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_outcome_description() {
        let ok = JobOutcome::Exited {
            code: Some(0),
            success: true,
        };
        assert!(ok.is_success());
        assert_eq!(ok.describe(), "finished");

        let failed = JobOutcome::Exited {
            code: Some(1),
            success: false,
        };
        assert!(!failed.is_success());
        assert_eq!(failed.describe(), "failed with exit code 1");
        assert!(!JobOutcome::Cancelled.is_success());
    }

    #[tokio::test]
    async fn test_unknown_filename_launches_without_asking() {
        let prompt = FixedAnswer::new(false);
        let options = DownloadOptions::default();

        let plan = prepare_download(
            Path::new("/no/such/yt-dlp"),
            "https://youtu.be/abc",
            &options,
            &prompt,
        )
        .await;

        match plan {
            JobPlan::Launch(job) => {
                assert_eq!(job.label, "https://youtu.be/abc");
                assert_eq!(job.argv[1], "https://youtu.be/abc");
            }
            other => panic!("expected launch, got {:?}", other),
        }
        assert_eq!(prompt.asked(), 0);
    }

    #[cfg(unix)]
    mod with_fake_binary {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::PathBuf;

        /// Script that always reports `existing.mp4` as the output name
        fn fake_ytdlp(dir: &Path) -> PathBuf {
            let script = dir.join("fake-yt-dlp");
            std::fs::write(&script, "#!/bin/sh\necho existing.mp4\n").unwrap();
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
            script
        }

        fn options_for(dir: &Path) -> DownloadOptions {
            DownloadOptions {
                folder: dir.to_string_lossy().into_owned(),
                ..Default::default()
            }
        }

        #[tokio::test]
        async fn test_existing_file_declined_is_skipped() {
            let temp = tempfile::tempdir().unwrap();
            let exe = fake_ytdlp(temp.path());
            std::fs::write(temp.path().join("existing.mp4"), b"old").unwrap();
            let prompt = FixedAnswer::new(false);

            let plan = prepare_download(&exe, "https://youtu.be/abc", &options_for(temp.path()), &prompt).await;

            assert_eq!(
                plan,
                JobPlan::Skipped {
                    url: "https://youtu.be/abc".to_string()
                }
            );
            assert_eq!(prompt.asked(), 1);
        }

        #[tokio::test]
        async fn test_existing_file_confirmed_is_launched() {
            let temp = tempfile::tempdir().unwrap();
            let exe = fake_ytdlp(temp.path());
            std::fs::write(temp.path().join("existing.mp4"), b"old").unwrap();
            let prompt = FixedAnswer::new(true);

            let plan = prepare_download(&exe, "https://youtu.be/abc", &options_for(temp.path()), &prompt).await;

            assert!(matches!(plan, JobPlan::Launch(_)));
            assert_eq!(prompt.asked(), 1);
        }

        #[tokio::test]
        async fn test_absent_file_is_launched_without_asking() {
            let temp = tempfile::tempdir().unwrap();
            let exe = fake_ytdlp(temp.path());
            let prompt = FixedAnswer::new(false);

            let plan = prepare_download(&exe, "https://youtu.be/abc", &options_for(temp.path()), &prompt).await;

            assert!(matches!(plan, JobPlan::Launch(_)));
            assert_eq!(prompt.asked(), 0);
        }
    }
}
