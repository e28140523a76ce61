//! On-disk download cache
//!
//! A file at `{dir}/{campaign}_{key}.hd5` counts as cached whatever its
//! contents. Concurrent callers racing on the same key both download it; the
//! last rename wins.

use crate::errors::FetchResult;
use crate::types::TestSeries;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Cache directory with hit/miss and download accounting
#[derive(Debug, Clone)]
pub struct DownloadCache {
    dir: PathBuf,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    bytes_downloaded: Arc<AtomicU64>,
}

impl DownloadCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            bytes_downloaded: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the cache directory if needed
    pub fn ensure_dir(&self) -> FetchResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Where the file for `key` lives, cached or not
    pub fn path_for(&self, campaign: TestSeries, key: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.hd5", campaign, key))
    }

    /// Cached file for `key`, recording a hit or a miss
    pub fn lookup(&self, campaign: TestSeries, key: &str) -> Option<PathBuf> {
        let path = self.path_for(campaign, key);
        if path.is_file() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Cache hit: {}", path.display());
            Some(path)
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("Cache miss: {}", path.display());
            None
        }
    }

    /// Count `bytes` written into the cache by a download
    pub fn record_download(&self, bytes: u64) {
        self.bytes_downloaded.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            bytes_downloaded: self.bytes_downloaded.load(Ordering::Relaxed),
        }
    }
}

/// Cache performance statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Bytes fetched over the network to fill misses
    pub bytes_downloaded: u64,
}

impl CacheStats {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests() == 0 {
            0.0
        } else {
            (self.hits as f64 / self.total_requests() as f64) * 100.0
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }
}
