use crate::fetch::{BatchPolicy, RetryPolicy, DEFAULT_BASE_URL};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from hawk.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Cache directory for downloaded test files
    pub download_dir: PathBuf,
    /// TOML lookup table of remote object ids
    pub lookup_table: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("./.hawk_data"),
            lookup_table: PathBuf::from("./hawk_lut.toml"),
        }
    }
}

/// Remote store access and batch behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
    pub confirm_threshold: usize,
    pub pacing_threshold: usize,
    pub pacing_delay_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 300,
            max_retries: 5,
            initial_backoff_ms: 500,
            backoff_multiplier: 2.0,
            max_backoff_seconds: 30,
            confirm_threshold: 10,
            pacing_threshold: 20,
            pacing_delay_seconds: 5,
        }
    }
}

impl FetchConfig {
    pub fn batch_policy(&self) -> BatchPolicy {
        BatchPolicy {
            confirm_threshold: self.confirm_threshold,
            pacing_threshold: self.pacing_threshold,
            pacing_delay: Duration::from_secs(self.pacing_delay_seconds),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries.max(1),
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            backoff_multiplier: self.backoff_multiplier,
            max_backoff_seconds: self.max_backoff_seconds,
        }
    }
}

impl AppConfig {
    /// Load configuration from hawk.toml and environment variables.
    /// Environment variables take precedence over file configuration.
    pub fn load() -> Result<Self, ConfigError> {
        let paths = PathsConfig::default();
        let fetch = FetchConfig::default();
        let config = Config::builder()
            .set_default("paths.download_dir", paths.download_dir.to_string_lossy().to_string())?
            .set_default("paths.lookup_table", paths.lookup_table.to_string_lossy().to_string())?
            .set_default("fetch.base_url", fetch.base_url)?
            .set_default("fetch.timeout_seconds", fetch.timeout_seconds)?
            .set_default("fetch.max_retries", fetch.max_retries as i64)?
            .set_default("fetch.initial_backoff_ms", fetch.initial_backoff_ms)?
            .set_default("fetch.backoff_multiplier", fetch.backoff_multiplier)?
            .set_default("fetch.max_backoff_seconds", fetch.max_backoff_seconds)?
            .set_default("fetch.confirm_threshold", fetch.confirm_threshold as i64)?
            .set_default("fetch.pacing_threshold", fetch.pacing_threshold as i64)?
            .set_default("fetch.pacing_delay_seconds", fetch.pacing_delay_seconds)?
            // Load from hawk.toml if it exists
            .add_source(File::with_name("hawk").required(false))
            // HAWK_FETCH__MAX_RETRIES=3 overrides fetch.max_retries
            .add_source(
                Environment::with_prefix("HAWK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // Short names for the two settings users change most
        if let Ok(dir) = env::var("HAWK_DATA_DIR") {
            app_config.paths.download_dir = PathBuf::from(dir);
        }
        if let Ok(table) = env::var("HAWK_LOOKUP_TABLE") {
            app_config.paths.lookup_table = PathBuf::from(table);
        }

        Ok(app_config)
    }

    /// Get default config values for CLI argument defaults
    pub fn get_defaults() -> Result<Self, ConfigError> {
        match Self::load() {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Falling back to built-in configuration: {}", e);
                Ok(Self {
                    paths: PathsConfig::default(),
                    fetch: FetchConfig::default(),
                })
            }
        }
    }
}
