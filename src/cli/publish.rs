//! The publish command
//!
//! Wires the configuration, collaborators, automation session and adapters
//! into one pipeline run, then prints the per-platform outcomes. Fatal
//! resolution/validation errors exit non-zero before any platform is
//! touched; individual platform failures do not.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crosspub_automation::{RemoteConfig, RemoteSession};
use crosspub_collab::{DingTalkConfig, DingTalkSource, DoubaoCollaborator, DoubaoConfig};
use crosspub_core::{
    AppConfig, AutoContinue, Checkpoint, OperatorGate, OutcomeStatus, PipelineReport,
    PlatformSelection, PublishPipeline, PublishRequest,
};
use crosspub_platforms::build_adapters;

/// Arguments for `crosspub publish`
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Article title; also the document-store lookup key
    #[arg(long)]
    pub title: String,

    /// Author shown on platforms that support attribution
    #[arg(long)]
    pub author: Option<String>,

    /// Summary text, or "auto" to generate one
    #[arg(long)]
    pub summary: Option<String>,

    /// Canonical article URL; fetched from the document store if omitted
    #[arg(long)]
    pub url: Option<String>,

    /// Local markdown file; downloaded from the document store if omitted
    #[arg(long = "markdown-file")]
    pub markdown_file: Option<PathBuf>,

    /// Local cover image; generated if omitted
    #[arg(long = "cover-image")]
    pub cover_image: Option<PathBuf>,

    /// Comma-separated tags, or "auto" to generate them
    #[arg(long)]
    pub tags: Option<String>,

    /// Short title for platforms with tight title limits
    #[arg(long = "short-title")]
    pub short_title: Option<String>,

    /// Comma-separated platform ids, or "all"
    #[arg(long, default_value = "all")]
    pub platforms: String,

    /// Where artifacts and the run report land
    #[arg(long = "results-dir")]
    pub results_dir: Option<PathBuf>,

    /// Browser profile directory for the automation session
    #[arg(long = "user-data-dir")]
    pub user_data_dir: Option<PathBuf>,

    /// Skip backup files when cleaning fetched markdown
    #[arg(long = "no-backup")]
    pub no_backup: bool,

    /// Continue through all checkpoints without asking
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

impl PublishArgs {
    fn into_request(self) -> anyhow::Result<(PublishRequest, PublishOverrides)> {
        let platforms = PlatformSelection::parse(&self.platforms)?;
        let mut request = PublishRequest::new(self.title)?.with_platforms(platforms);
        if let Some(author) = self.author {
            request = request.with_author(author);
        }
        if let Some(summary) = self.summary {
            request = request.with_summary(summary);
        }
        if let Some(url) = self.url {
            request = request.with_url(url);
        }
        if let Some(markdown) = self.markdown_file {
            request = request.with_markdown(markdown);
        }
        if let Some(cover) = self.cover_image {
            request = request.with_cover(cover);
        }
        if let Some(tags) = self.tags {
            request = request.with_tags(tags);
        }
        if let Some(short_title) = self.short_title {
            request = request.with_short_title(short_title);
        }
        Ok((
            request,
            PublishOverrides {
                results_dir: self.results_dir,
                user_data_dir: self.user_data_dir,
                no_backup: self.no_backup,
                yes: self.yes,
            },
        ))
    }
}

struct PublishOverrides {
    results_dir: Option<PathBuf>,
    user_data_dir: Option<PathBuf>,
    no_backup: bool,
    yes: bool,
}

/// Gate asking on stdin at each checkpoint
struct StdinGate;

#[async_trait::async_trait]
impl OperatorGate for StdinGate {
    async fn confirm(&self, checkpoint: Checkpoint) -> bool {
        let prompt = format!("{checkpoint} done. Continue? [Y/n] ");
        let answer = tokio::task::spawn_blocking(move || {
            print!("{prompt}");
            let _ = std::io::stdout().flush();
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await;
        match answer {
            Ok(Ok(line)) => {
                let line = line.trim();
                line.is_empty() || line.eq_ignore_ascii_case("y")
            }
            _ => false,
        }
    }
}

/// Run the publish command
pub async fn run(args: PublishArgs) -> anyhow::Result<()> {
    let (request, overrides) = args.into_request()?;

    let mut config = AppConfig::from_env()?;
    if let Some(dir) = overrides.results_dir {
        config = config.with_results_dir(dir);
    }
    if let Some(dir) = overrides.user_data_dir {
        config = config.with_user_data_dir(dir);
    }
    if overrides.no_backup {
        config = config.with_markdown_backup(false);
    }

    let session = Arc::new(
        RemoteSession::connect(
            RemoteConfig::from_env().with_user_data_dir(config.user_data_dir.clone()),
        )
        .await
        .context("connecting to the automation driver")?,
    );
    info!("automation driver connected");

    let ai = DoubaoCollaborator::new(
        session.clone(),
        DoubaoConfig::default().with_downloads_dir(config.results_dir.join("generated-images")),
    );
    let docs = DingTalkSource::new(DingTalkConfig::new(
        config.dingtalk.app_key.clone(),
        config.dingtalk.app_secret.clone(),
        config.dingtalk.user_id.clone(),
    ))?;

    let platforms = request.platforms.platforms();
    let adapters = build_adapters(&platforms, &config)?;

    let auto_gate = AutoContinue;
    let stdin_gate = StdinGate;
    let gate: &dyn OperatorGate = if overrides.yes { &auto_gate } else { &stdin_gate };

    let pipeline = PublishPipeline::new(&config, &ai, &docs, session.as_ref(), adapters, gate);
    let report = pipeline.run(&request).await?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &PipelineReport) {
    println!();
    println!("Publish results for \"{}\":", report.content.title);
    for outcome in &report.outcomes {
        let mark = match outcome.status {
            OutcomeStatus::Succeeded => "ok",
            OutcomeStatus::Failed => "FAILED",
            OutcomeStatus::Skipped => "skipped",
        };
        match &outcome.detail {
            Some(detail) => {
                println!("  {:<12} {mark:<8} {detail}", outcome.platform.as_str())
            }
            None => println!("  {:<12} {mark}", outcome.platform.as_str()),
        }
    }
}
