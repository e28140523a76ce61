//! Orchestrator end to end with a stub downloader and in-memory loading

use crate::common::{fixture_table, scenario_container, StubDownloader};
use hawk_loader::errors::{AppError, LoaderResult};
use hawk_loader::fetch::{is_affirmative, BatchPolicy, FetchRequest, HawkFetcher, RetryPolicy};
use hawk_loader::loader::load_container;
use hawk_loader::types::{get_path, LoadOptions, TestSeries, Tree};
use hawk_loader::FetchError;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Loads the reference container for every file, honouring the file name prefix
fn scenario_loader(path: &Path, opts: &LoadOptions) -> LoaderResult<Tree> {
    load_container(&scenario_container(), path, opts)
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        initial_backoff: Duration::from_millis(1),
        backoff_multiplier: 2.0,
        max_backoff_seconds: 1,
    }
}

#[tokio::test]
async fn test_fetch_and_load_batch() -> anyhow::Result<()> {
    let tmp = TempDir::new()?;
    let downloader = StubDownloader::default();
    let fetcher = HawkFetcher::new(fixture_table(TestSeries::Lms, "BR_AR", 2, 2), downloader.clone(), tmp.path())
        .with_loader(scenario_loader);

    let request = FetchRequest::new("LMS", "BR_AR")
        .runs([2])
        .load_options(LoadOptions::default().compressed(true));
    let batch = fetcher.fetch(&request).await?.expect("batch not declined");

    assert_eq!(batch.keys().collect::<Vec<_>>(), vec!["BR_AR_2_1", "BR_AR_2_2"]);
    // Load options are forwarded to the loader
    assert!(get_path(&batch["BR_AR_2_1"], &["X_data", "F1"]).is_some());
    assert_eq!(downloader.call_count(), 2);
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("LMS_BR_AR_2_2.hd5"))?,
        "remote-BR_AR-2-2"
    );
    Ok(())
}

#[tokio::test]
async fn test_declined_prompt_returns_nothing() {
    let tmp = TempDir::new().unwrap();
    let downloader = StubDownloader::default();
    let asked = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&asked);
    let fetcher = HawkFetcher::new(fixture_table(TestSeries::Ni, "DS_TLE", 5, 2), downloader.clone(), tmp.path())
        .with_loader(scenario_loader)
        .with_confirmation(move |summary| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert_eq!(summary.key_count, 10);
            assert!((summary.estimated_gb - 2.0).abs() < 1e-9);
            is_affirmative("n")
        });

    let result = fetcher.fetch(&FetchRequest::new("NI", "DS_TLE")).await.unwrap();
    assert!(result.is_none());
    assert_eq!(asked.load(Ordering::SeqCst), 1);
    assert_eq!(downloader.call_count(), 0);
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_accepted_prompt_proceeds() {
    let tmp = TempDir::new().unwrap();
    let downloader = StubDownloader::default();
    let fetcher = HawkFetcher::new(fixture_table(TestSeries::Ni, "DS_TLE", 5, 2), downloader.clone(), tmp.path())
        .with_loader(scenario_loader)
        .with_confirmation(|_| is_affirmative("yes"));

    let batch = fetcher.fetch(&FetchRequest::new("NI", "DS_TLE").disk_only(true)).await.unwrap();
    assert_eq!(batch.map(|b| b.len()), Some(0));
    assert_eq!(downloader.call_count(), 10);
}

#[tokio::test]
async fn test_invalid_campaign_touches_nothing() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("cache");
    let downloader = StubDownloader::default();
    let fetcher = HawkFetcher::new(fixture_table(TestSeries::Lms, "BR_AR", 1, 1), downloader.clone(), &dir);

    let err = fetcher.fetch(&FetchRequest::new("FRF", "BR_AR")).await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(FetchError::InvalidCampaign(c)) if c == "FRF"));
    assert!(!dir.exists());
    assert_eq!(downloader.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_key_before_any_download() {
    let tmp = TempDir::new().unwrap();
    let downloader = StubDownloader::default();
    let fetcher = HawkFetcher::new(fixture_table(TestSeries::Lms, "BR_AR", 2, 1), downloader.clone(), tmp.path())
        .with_loader(scenario_loader);

    let request = FetchRequest::new("LMS", "BR_AR").runs([1, 2, 3]).reps([1]);
    let err = fetcher.fetch(&request).await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(FetchError::UnknownKey { key, .. }) if key == "BR_AR_3_1"));
    assert_eq!(downloader.call_count(), 0);

    let err = fetcher.fetch(&FetchRequest::new("LMS", "XX")).await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(FetchError::UnknownKey { .. })));
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let tmp = TempDir::new().unwrap();
    let downloader = StubDownloader::flaky(2);
    let fetcher = HawkFetcher::new(fixture_table(TestSeries::Lms, "BR_AR", 1, 1), downloader.clone(), tmp.path())
        .with_loader(scenario_loader)
        .with_retry_policy(fast_retry());

    let batch = fetcher.fetch(&FetchRequest::new("LMS", "BR_AR")).await.unwrap().unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(downloader.call_count(), 3);

    let tmp = TempDir::new().unwrap();
    let downloader = StubDownloader::flaky(10);
    let fetcher = HawkFetcher::new(fixture_table(TestSeries::Lms, "BR_AR", 1, 1), downloader.clone(), tmp.path())
        .with_loader(scenario_loader)
        .with_retry_policy(fast_retry());
    let err = fetcher.fetch(&FetchRequest::new("LMS", "BR_AR")).await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(FetchError::MaxRetriesExceeded { .. })));
}

#[tokio::test]
async fn test_pacing_only_above_threshold() {
    let policy = BatchPolicy {
        confirm_threshold: 10,
        pacing_threshold: 20,
        pacing_delay: Duration::from_millis(20),
    };

    // 21 keys: 20 delays between 21 downloads
    let tmp = TempDir::new().unwrap();
    let downloader = StubDownloader::default();
    let fetcher = HawkFetcher::new(fixture_table(TestSeries::Lms, "BR_AR", 7, 3), downloader.clone(), tmp.path())
        .with_batch_policy(policy.clone())
        .with_loader(scenario_loader);
    let request = FetchRequest::new("LMS", "BR_AR").ask(false).disk_only(true);
    let started = Instant::now();
    fetcher.fetch(&request).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(400));
    assert_eq!(downloader.call_count(), 21);

    // Fully cached: nothing downloaded, nothing paced
    fetcher.fetch(&request).await.unwrap();
    assert_eq!(downloader.call_count(), 21);
    assert_eq!(fetcher.cache_stats().hits, 21);

    // 20 keys: no pacing at all
    let slow = BatchPolicy {
        pacing_delay: Duration::from_secs(2),
        ..policy
    };
    let tmp = TempDir::new().unwrap();
    let fetcher = HawkFetcher::new(fixture_table(TestSeries::Lms, "BR_AR", 5, 4), StubDownloader::default(), tmp.path())
        .with_batch_policy(slow)
        .with_loader(scenario_loader);
    let started = Instant::now();
    fetcher.fetch(&request).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(10));
}
