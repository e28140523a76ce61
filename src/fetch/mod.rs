//! Remote fetch of HAWK test files
//!
//! - **Lookup table** - campaign/key to remote object id (TOML)
//! - **Cache** - downloaded files under `{dir}/{campaign}_{key}.hd5`
//! - **Download** - fetch-by-id over HTTP via `reqwest`
//! - **Retry** - exponential backoff for transient download failures
//! - **Orchestrator** - batch resolution, confirmation, pacing and loading

pub mod cache;
pub mod download;
pub mod lut;
pub mod orchestrator;
pub mod retry;

pub use cache::{CacheStats, DownloadCache};
pub use download::{Downloader, HttpDownloader, DEFAULT_BASE_URL};
pub use lut::{parse_campaign, LookupTable, TestKey};
pub use orchestrator::{
    is_affirmative, prompt_stdin, BatchPolicy, BatchSummary, FetchRequest, FetchedData,
    FileLoader, HawkFetcher, Hdf5FileLoader,
};
pub use retry::{calculate_next_backoff, retry_with_backoff, RetryPolicy};
