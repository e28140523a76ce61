use super::{LoadArgs, OutputArgs};
use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::fetch::{prompt_stdin, FetchRequest, HawkFetcher, HttpDownloader, LookupTable};
use crate::report::{emit, OutputFormat, ReportFormatter};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Download (and load) HAWK test files by test id
#[derive(Args)]
pub struct FetchCommand {
    /// Campaign (LMS or NI)
    #[arg(long)]
    campaign: String,

    /// Test id, e.g. BR_AR
    #[arg(long)]
    test_id: String,

    /// Runs to fetch (repeatable; default: all)
    #[arg(long = "run")]
    runs: Vec<u32>,

    /// Repetitions to fetch (repeatable; default: all per run)
    #[arg(long = "rep")]
    reps: Vec<u32>,

    /// Cache directory (overrides hawk.toml and env vars)
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Lookup table path (overrides hawk.toml and env vars)
    #[arg(long)]
    lookup_table: Option<PathBuf>,

    /// Remote store base URL (overrides hawk.toml)
    #[arg(long)]
    base_url: Option<String>,

    /// Download only, do not load
    #[arg(long)]
    disk_only: bool,

    /// Do not ask before large batches
    #[arg(long, short = 'y')]
    yes: bool,

    #[command(flatten)]
    load: LoadArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl FetchCommand {
    pub async fn run(&self) -> AppResult<()> {
        let format: OutputFormat = self.output.format.parse()?;
        let app_config = AppConfig::get_defaults()?;

        // CLI arguments override config values
        let download_dir = self
            .download_dir
            .clone()
            .unwrap_or(app_config.paths.download_dir.clone());
        let table_path = self
            .lookup_table
            .clone()
            .unwrap_or(app_config.paths.lookup_table.clone());
        let base_url = self
            .base_url
            .clone()
            .unwrap_or(app_config.fetch.base_url.clone());

        info!("Configuration:");
        info!("  Download dir: {}", download_dir.display());
        info!("  Lookup table: {}", table_path.display());
        info!("  Base URL: {}", base_url);

        let table = LookupTable::load(&table_path)?;
        let downloader = HttpDownloader::new(base_url, app_config.fetch.timeout_seconds)?;
        let fetcher = HawkFetcher::new(table, downloader, download_dir)
            .with_batch_policy(app_config.fetch.batch_policy())
            .with_retry_policy(app_config.fetch.retry_policy())
            .with_confirmation(prompt_stdin);

        let mut request = FetchRequest::new(self.campaign.clone(), self.test_id.clone())
            .disk_only(self.disk_only)
            .ask(!self.yes)
            .load_options(self.load.to_options());
        if !self.runs.is_empty() {
            request = request.runs(self.runs.iter().copied());
        }
        if !self.reps.is_empty() {
            request = request.reps(self.reps.iter().copied());
        }

        let Some(batch) = fetcher.fetch(&request).await? else {
            println!("Fetch cancelled");
            return Ok(());
        };

        if self.disk_only {
            println!(
                "Files cached in {}",
                fetcher.cache().dir().display()
            );
        } else {
            let content = ReportFormatter::format_batch(&batch, format)?;
            emit(&content, self.output.output.as_deref())?;
        }
        println!("{}", ReportFormatter::format_cache_stats(&fetcher.cache_stats()));
        Ok(())
    }
}
