//! `replypulse` CLI - fetch posts, score reply sentiment, render a report

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use replypulse::{
    FeedFetcher, HttpFeedApi, LexiconScorer, Pipeline, ReportFormat, Settings, SnapshotStore,
    TokioSleeper,
};

#[derive(Parser)]
#[command(name = "replypulse")]
#[command(about = "Tracks public figures' posts and scores reply sentiment")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline: fetch, score, and render the report
    Run {
        /// Skip live fetching and read the snapshot instead
        #[arg(long)]
        offline: bool,

        /// Config file (default: ~/.config/replypulse/config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Snapshot file path (overrides config)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Report output path (overrides config)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Report format: text, markdown, or html
        #[arg(short, long, default_value = "html")]
        format: String,

        /// Platform instance base URL (overrides config)
        #[arg(long)]
        instance: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            offline,
            config,
            snapshot,
            out,
            format,
            instance,
        } => {
            cmd_run(offline, config, snapshot, out, &format, instance).await?;
        }
    }

    Ok(())
}

async fn cmd_run(
    offline: bool,
    config: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    out: Option<PathBuf>,
    format: &str,
    instance: Option<String>,
) -> Result<()> {
    let mut settings = Settings::load(config.as_deref())?;
    if let Some(path) = snapshot {
        settings.snapshot_path = path;
    }
    if let Some(path) = out {
        settings.report_path = path;
    }
    if let Some(url) = instance {
        settings.instance = url;
    }

    let format = ReportFormat::from_name(format)
        .ok_or_else(|| anyhow::anyhow!("unknown report format: {format} (expected text, markdown, or html)"))?;

    let authors = settings.tracked_authors();
    if authors.is_empty() {
        anyhow::bail!("no tracked authors configured");
    }

    // Offline runs never touch the network, so the API client (and its
    // instance URL validation) only exists on the live path.
    let api = if offline {
        None
    } else {
        Some(HttpFeedApi::new(&settings.instance)?)
    };
    let sleeper = TokioSleeper;
    let scorer = LexiconScorer::new();
    let fetcher = api.as_ref().map(|api| {
        FeedFetcher::new(
            api,
            &sleeper,
            settings.quota_policy(),
            settings.posts_per_author,
            settings.reply_page_limit,
            settings.reply_page_size,
        )
    });

    let pipeline = Pipeline::new(
        fetcher,
        SnapshotStore::new(&settings.snapshot_path),
        &scorer,
        &settings.report_path,
        format,
    );

    let digest = pipeline.run(&authors).await?;

    println!(
        "Summarized {} post(s) ({} without replies); report written to {}",
        digest.summaries.len(),
        digest.no_replies.len(),
        settings.report_path.display()
    );

    Ok(())
}
