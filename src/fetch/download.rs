//! Fetch-by-id from the remote object store

use crate::errors::{FetchError, FetchResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Public share endpoint the HAWK files are published on
pub const DEFAULT_BASE_URL: &str = "https://drive.google.com/uc";

/// Single blocking-from-the-caller's-view fetch of one remote object
pub trait Downloader {
    /// Fetch `remote_id` into `dest`, returning the number of bytes written
    fn download(&self, remote_id: &str, dest: &Path) -> impl Future<Output = FetchResult<u64>> + Send;
}

/// Downloader for public file-share links
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
    base_url: String,
}

impl HttpDownloader {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Use a preconfigured client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Direct-download URL for `remote_id`
    pub fn url_for(&self, remote_id: &str) -> String {
        format!(
            "{}?export=download&id={}&confirm=t",
            self.base_url.trim_end_matches('/'),
            remote_id
        )
    }
}

impl Downloader for HttpDownloader {
    async fn download(&self, remote_id: &str, dest: &Path) -> FetchResult<u64> {
        let url = self.url_for(remote_id);
        info!("Downloading {} -> {}", remote_id, dest.display());

        let mut response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                remote_id: remote_id.to_string(),
                status: status.as_u16(),
            });
        }
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html"));
        if is_html {
            return Err(FetchError::UnexpectedContent {
                remote_id: remote_id.to_string(),
                reason: "received an HTML page instead of file content".to_string(),
            });
        }

        let partial = partial_path(dest);
        let written = match write_body(&mut response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                    debug!("Could not remove {}: {}", partial.display(), cleanup);
                }
                return Err(e);
            }
        };
        tokio::fs::rename(&partial, dest).await?;

        debug!("Wrote {} bytes to {}", written, dest.display());
        Ok(written)
    }
}

/// Stream the response body into `path`
async fn write_body(response: &mut reqwest::Response, path: &Path) -> FetchResult<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// Sibling path used while a download is in flight
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}
