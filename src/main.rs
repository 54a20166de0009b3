//! YT-DLP Made Easy - a desktop front-end for yt-dlp
//!
//! Without arguments the window opens. `--headless` downloads the given URLs
//! from the terminal and `--update` updates the managed yt-dlp binary.

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing_subscriber::EnvFilter;
use ytdlp_easy::app;
use ytdlp_easy::downloader::options::SUBTITLE_LANGUAGES;
use ytdlp_easy::downloader::{
    prepare_download, run_completion_hooks, run_job, ActivityLog, CompletionHooks,
    DownloadOptions, JobEvent, JobOutcome, JobPlan, JobSpec, Quality,
};
use ytdlp_easy::prompt::FixedAnswer;
use ytdlp_easy::utils::{AppPaths, Preferences};
use ytdlp_easy::ytdlp;

#[derive(Parser)]
#[command(name = "ytdlp-easy", version, about = "A desktop front-end for yt-dlp")]
struct Args {
    /// Download the given URLs without opening the window
    #[arg(long, num_args = 1.., value_name = "URL")]
    headless: Vec<String>,

    /// Extract audio as mp3
    #[arg(long)]
    audio_only: bool,

    /// Best, 1080p, 720p or 480p
    #[arg(long, default_value = "Best", value_parser = parse_quality)]
    quality: Quality,

    /// Subtitle language to download
    #[arg(long, value_name = "LANG", value_parser = PossibleValuesParser::new(SUBTITLE_LANGUAGES))]
    subs: Option<String>,

    /// Remove SponsorBlock segments
    #[arg(long)]
    sponsorblock: bool,

    /// Download rate limit, e.g. 500K
    #[arg(long, value_name = "RATE")]
    limit_rate: Option<String>,

    /// Proxy for yt-dlp, e.g. socks5://127.0.0.1:1080
    #[arg(long, value_name = "URL")]
    proxy: Option<String>,

    /// Output filename template
    #[arg(long, value_name = "TEMPLATE")]
    output: Option<String>,

    /// Destination folder (defaults to the current directory)
    #[arg(long)]
    folder: Option<String>,

    /// Keep files that already exist instead of replacing them
    #[arg(long)]
    skip_existing: bool,

    /// Update yt-dlp and exit
    #[arg(long, conflicts_with = "headless")]
    update: bool,

    /// Where yt-dlp, the activity log and preferences live
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl Args {
    fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            folder: self.folder.clone().unwrap_or_default(),
            quality: self.quality,
            audio_only: self.audio_only,
            subtitle_language: self.subs.clone(),
            sponsorblock: self.sponsorblock,
            rate_limit: self.limit_rate.clone().unwrap_or_default(),
            proxy: self.proxy.clone().unwrap_or_default(),
            output_template: self.output.clone().unwrap_or_default(),
        }
    }
}

fn parse_quality(value: &str) -> Result<Quality, String> {
    Quality::parse(value).ok_or_else(|| format!("unknown quality `{}`", value))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    install_panic_hook();

    let paths = match &args.data_dir {
        Some(dir) => AppPaths::new(dir),
        None => AppPaths::default_location(),
    };
    paths
        .ensure_dirs()
        .with_context(|| format!("cannot create {}", paths.data_dir().display()))?;
    let prefs = Preferences::load(&paths.prefs_file);

    if !args.headless.is_empty() || args.update {
        let rt = tokio::runtime::Runtime::new()?;
        let success = rt.block_on(async {
            if args.update {
                update_cli(&paths).await
            } else {
                download_cli(&args, &paths, &prefs).await
            }
        })?;
        if !success {
            std::process::exit(1);
        }
        return Ok(());
    }

    app::run(paths, prefs)
}

/// Log the panic and tell the user before the process goes away
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!("Fatal error: {}", info);
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Fatal Error")
            .set_description(info.to_string())
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
        default_hook(info);
    }));
}

async fn download_cli(args: &Args, paths: &AppPaths, prefs: &Preferences) -> Result<bool> {
    let exe = ytdlp::ensure_ytdlp(paths).await?;
    let activity = ActivityLog::open(&paths.activity_log).await?;
    let hooks = CompletionHooks::from(prefs);
    let options = args.download_options();
    let prompt = FixedAnswer::new(!args.skip_existing);

    let mut all_ok = true;
    for url in &args.headless {
        match prepare_download(&exe, url, &options, &prompt).await {
            JobPlan::Launch(spec) => {
                let outcome = run_cli_job(spec, &activity).await;
                run_completion_hooks(url, &outcome, &hooks).await;
                all_ok &= outcome.is_success();
            }
            JobPlan::Skipped { url } => println!("Skipped {}", url),
        }
    }
    Ok(all_ok)
}

async fn update_cli(paths: &AppPaths) -> Result<bool> {
    let exe = ytdlp::ensure_ytdlp(paths).await?;
    let activity = ActivityLog::open(&paths.activity_log).await?;

    match ytdlp::request_update(&FixedAnswer::new(true), &exe).await {
        Some(spec) => Ok(run_cli_job(spec, &activity).await.is_success()),
        None => Ok(false),
    }
}

/// Run one job, printing its output as it arrives
async fn run_cli_job(spec: JobSpec, activity: &ActivityLog) -> JobOutcome {
    let (tx, mut rx) = mpsc::channel::<JobEvent>(256);

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                JobEvent::Started { label, .. } => println!("==> {}", label),
                JobEvent::Line { line, .. } => println!("{}", line),
                JobEvent::Finished { label, outcome, .. } => {
                    println!("==> {} {}", label, outcome.describe())
                }
            }
        }
    });

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let outcome = run_job(spec, Some(activity.clone()), &tx, cancel).await;
    drop(tx);
    let _ = printer.await;
    outcome
}
