//! Batch fetch: resolve test keys, confirm, download what is missing, load

use super::cache::{CacheStats, DownloadCache};
use super::download::Downloader;
use super::lut::{parse_campaign, LookupTable, TestKey};
use super::retry::{retry_with_backoff, RetryPolicy};
use crate::errors::{AppResult, FetchError, FetchResult, LoaderResult};
use crate::loader::load_hdf5;
use crate::types::{LoadOptions, TestSeries, Tree};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Approximate size of one test file
pub const GB_PER_FILE: f64 = 0.2;

/// Loaded results keyed by composite test key
pub type FetchedData = BTreeMap<String, Tree>;

/// Turns a cached file into a nested mapping
pub trait FileLoader {
    fn load(&self, path: &Path, opts: &LoadOptions) -> LoaderResult<Tree>;
}

impl<F> FileLoader for F
where
    F: Fn(&Path, &LoadOptions) -> LoaderResult<Tree>,
{
    fn load(&self, path: &Path, opts: &LoadOptions) -> LoaderResult<Tree> {
        self(path, opts)
    }
}

/// Loads files with [`load_hdf5`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Hdf5FileLoader;

impl FileLoader for Hdf5FileLoader {
    fn load(&self, path: &Path, opts: &LoadOptions) -> LoaderResult<Tree> {
        load_hdf5(path, opts)
    }
}

/// Batch-size thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPolicy {
    /// Batches of at least this many keys need confirmation
    pub confirm_threshold: usize,
    /// Batches of more than this many keys are paced
    pub pacing_threshold: usize,
    /// Delay before each network download after the first in a paced batch
    pub pacing_delay: Duration,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            confirm_threshold: 10,
            pacing_threshold: 20,
            pacing_delay: Duration::from_secs(5),
        }
    }
}

/// What a confirmation callback is asked about
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    pub key_count: usize,
    pub estimated_gb: f64,
}

impl BatchSummary {
    pub fn new(key_count: usize) -> Self {
        Self {
            key_count,
            estimated_gb: key_count as f64 * GB_PER_FILE,
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "A large number of data files have been requested ({}) i.e. >{:.1}GB of data do you wish to continue? y/n",
            self.key_count, self.estimated_gb
        )
    }
}

/// Whether a typed answer counts as consent
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y" | "yes")
}

/// Ask on stdout and read the answer from stdin
pub fn prompt_stdin(summary: &BatchSummary) -> bool {
    print!("{}   ", summary.prompt());
    let _ = std::io::stdout().flush();
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_affirmative(&answer),
        Err(_) => false,
    }
}

type Confirm = Box<dyn Fn(&BatchSummary) -> bool + Send + Sync>;

/// One batch request
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// `LMS` or `NI`
    pub campaign: String,
    pub test_id: String,
    /// `None` = every run listed for the test
    pub runs: Option<Vec<u32>>,
    /// `None` = every rep listed for each run
    pub reps: Option<Vec<u32>>,
    /// Download only; nothing is loaded
    pub disk_only: bool,
    /// Confirm large batches
    pub ask: bool,
    pub load_options: LoadOptions,
}

impl FetchRequest {
    pub fn new(campaign: impl Into<String>, test_id: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
            test_id: test_id.into(),
            runs: None,
            reps: None,
            disk_only: false,
            ask: true,
            load_options: LoadOptions::default(),
        }
    }

    pub fn runs(mut self, runs: impl IntoIterator<Item = u32>) -> Self {
        self.runs = Some(runs.into_iter().collect());
        self
    }

    pub fn reps(mut self, reps: impl IntoIterator<Item = u32>) -> Self {
        self.reps = Some(reps.into_iter().collect());
        self
    }

    pub fn disk_only(mut self, disk_only: bool) -> Self {
        self.disk_only = disk_only;
        self
    }

    pub fn ask(mut self, ask: bool) -> Self {
        self.ask = ask;
        self
    }

    pub fn load_options(mut self, opts: LoadOptions) -> Self {
        self.load_options = opts;
        self
    }
}

/// Fetch orchestrator over an immutable lookup table
pub struct HawkFetcher<D, L = Hdf5FileLoader> {
    table: LookupTable,
    downloader: D,
    loader: L,
    cache: DownloadCache,
    batch: BatchPolicy,
    retry: RetryPolicy,
    confirm: Confirm,
}

impl<D: Downloader> HawkFetcher<D> {
    pub fn new(table: LookupTable, downloader: D, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            table,
            downloader,
            loader: Hdf5FileLoader,
            cache: DownloadCache::new(download_dir),
            batch: BatchPolicy::default(),
            retry: RetryPolicy::default(),
            confirm: Box::new(prompt_stdin),
        }
    }
}

impl<D: Downloader, L: FileLoader> HawkFetcher<D, L> {
    pub fn with_loader<L2: FileLoader>(self, loader: L2) -> HawkFetcher<D, L2> {
        HawkFetcher {
            table: self.table,
            downloader: self.downloader,
            loader,
            cache: self.cache,
            batch: self.batch,
            retry: self.retry,
            confirm: self.confirm,
        }
    }

    pub fn with_batch_policy(mut self, batch: BatchPolicy) -> Self {
        self.batch = batch;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the stdin prompt used for large batches
    pub fn with_confirmation<F>(mut self, confirm: F) -> Self
    where
        F: Fn(&BatchSummary) -> bool + Send + Sync + 'static,
    {
        self.confirm = Box::new(confirm);
        self
    }

    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    pub fn cache(&self) -> &DownloadCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.get_stats()
    }

    /// Composite keys a request covers, in run/rep order.
    ///
    /// Every key must be listed in the table.
    pub fn resolve_keys(&self, campaign: TestSeries, req: &FetchRequest) -> FetchResult<Vec<String>> {
        let runs: Vec<u32> = match &req.runs {
            Some(runs) => runs.clone(),
            None => self.table.runs(campaign, &req.test_id).into_iter().collect(),
        };

        let mut keys = BTreeSet::new();
        for run in runs {
            let reps: Vec<u32> = match &req.reps {
                Some(reps) => reps.clone(),
                None => self.table.reps(campaign, &req.test_id, run).into_iter().collect(),
            };
            for rep in reps {
                keys.insert(TestKey::new(req.test_id.as_str(), run, rep));
            }
        }

        if keys.is_empty() {
            return Err(FetchError::UnknownKey {
                campaign: campaign.to_string(),
                key: format!("{}_*_*", req.test_id),
            });
        }

        let keys: Vec<String> = keys.iter().map(TestKey::to_string).collect();
        if let Some(missing) = keys.iter().find(|k| self.table.remote_id(campaign, k).is_none()) {
            return Err(FetchError::UnknownKey {
                campaign: campaign.to_string(),
                key: missing.clone(),
            });
        }
        Ok(keys)
    }

    /// Run one batch.
    ///
    /// `Ok(None)` when a large batch was declined; nothing is downloaded then.
    /// In disk-only mode files are cached and the mapping is empty.
    pub async fn fetch(&self, req: &FetchRequest) -> AppResult<Option<FetchedData>> {
        let campaign = parse_campaign(&req.campaign)?;
        let keys = self.resolve_keys(campaign, req)?;
        info!("Resolved {} {} keys for {}", keys.len(), campaign, req.test_id);

        let summary = BatchSummary::new(keys.len());
        if req.ask && keys.len() >= self.batch.confirm_threshold && !(self.confirm)(&summary) {
            info!("Batch of {} files declined", keys.len());
            return Ok(None);
        }

        self.cache.ensure_dir()?;
        let paced = keys.len() > self.batch.pacing_threshold;
        let mut downloads = 0usize;
        let mut out = FetchedData::new();

        for key in &keys {
            let path = match self.cache.lookup(campaign, key) {
                Some(path) => {
                    info!("Using cached version: {}", path.display());
                    path
                }
                None => {
                    if paced && downloads > 0 {
                        debug!("Pacing for {:?} before {}", self.batch.pacing_delay, key);
                        sleep(self.batch.pacing_delay).await;
                    }
                    downloads += 1;
                    self.download_key(campaign, key).await?
                }
            };

            if !req.disk_only {
                let tree = self.loader.load(&path, &req.load_options)?;
                out.insert(key.clone(), tree);
            }
        }

        let stats = self.cache.get_stats();
        info!(
            "Fetched {} keys ({} downloaded, cache hit rate {:.1}%)",
            keys.len(),
            downloads,
            stats.hit_rate()
        );
        Ok(Some(out))
    }

    async fn download_key(&self, campaign: TestSeries, key: &str) -> FetchResult<PathBuf> {
        let remote_id = self
            .table
            .remote_id(campaign, key)
            .ok_or_else(|| FetchError::UnknownKey {
                campaign: campaign.to_string(),
                key: key.to_string(),
            })?;
        let dest = self.cache.path_for(campaign, key);

        let downloader = &self.downloader;
        let target = dest.as_path();
        let label = format!("download({})", key);
        let bytes =
            retry_with_backoff(&self.retry, &label, move || downloader.download(remote_id, target)).await?;
        self.cache.record_download(bytes);
        Ok(dest)
    }
}
