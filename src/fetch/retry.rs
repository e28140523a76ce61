//! Exponential backoff for downloads

use crate::errors::{FetchError, FetchResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// Calculate next backoff duration using exponential backoff with a maximum cap
///
/// `new_backoff = min(current_backoff * multiplier, max_backoff)`
///
/// # Example
/// ```
/// use std::time::Duration;
/// use hawk_loader::fetch::calculate_next_backoff;
///
/// let next = calculate_next_backoff(Duration::from_millis(500), 2.0, 30);
/// assert_eq!(next, Duration::from_millis(1000));
/// ```
pub fn calculate_next_backoff(
    current_backoff: Duration,
    multiplier: f64,
    max_backoff_seconds: u64,
) -> Duration {
    Duration::from_millis((current_backoff.as_millis() as f64 * multiplier) as u64)
        .min(Duration::from_secs(max_backoff_seconds))
}

/// Attempt limits and backoff curve
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub initial_backoff: Duration,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_backoff: Duration::from_millis(500),
            backoff_multiplier: 2.0,
            max_backoff_seconds: 30,
        }
    }
}

/// Run `operation` until it succeeds, fails permanently or runs out of attempts.
///
/// Only errors for which [`FetchError::is_transient`] holds are retried.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> FetchResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = FetchResult<T>>,
{
    let mut attempts = 0;
    let mut backoff = policy.initial_backoff;

    loop {
        match operation().await {
            Ok(value) => {
                if attempts > 0 {
                    debug!("{} succeeded after {} attempts", label, attempts + 1);
                }
                return Ok(value);
            }
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) => {
                attempts += 1;
                if attempts >= policy.max_retries {
                    error!("{} failed after {} attempts: {}", label, attempts, e);
                    return Err(FetchError::MaxRetriesExceeded {
                        operation: format!("{} ({})", label, e),
                    });
                }
                warn!(
                    "{} attempt {} failed, retrying in {:?}: {}",
                    label, attempts, backoff, e
                );
                sleep(backoff).await;
                backoff = calculate_next_backoff(
                    backoff,
                    policy.backoff_multiplier,
                    policy.max_backoff_seconds,
                );
            }
        }
    }
}
