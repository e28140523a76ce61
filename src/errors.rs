use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Container parsing
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),

    /// Remote fetch and cache operations
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Container parser error types
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Resolved test-series tag is neither LMS nor NI
    #[error("Unsupported test series: {0} (expected LMS or NI)")]
    UnsupportedSchema(String),

    /// Opening or reading the container failed
    #[error("Container access failed at '{path}': {message}")]
    ContainerAccess { path: String, message: String },

    /// A requested sensor, field or required dataset is absent
    #[error("Missing path in container: {0}")]
    MissingPath(String),

    /// Crate was built without the native HDF5 backend
    #[error("HDF5 support not compiled in (rebuild with --features hdf5)")]
    BackendUnavailable,
}

impl LoaderError {
    pub fn access(path: impl Into<String>, message: impl ToString) -> Self {
        LoaderError::ContainerAccess {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Fetch orchestrator error types
#[derive(Error, Debug)]
pub enum FetchError {
    /// Campaign tag outside the fixed set
    #[error("Invalid campaign '{0}': select LMS or NI for frequency and time datasets respectively")]
    InvalidCampaign(String),

    /// Composite key not present in the lookup table
    #[error("Unknown test key for {campaign}: {key}")]
    UnknownKey { campaign: String, key: String },

    /// Lookup table could not be read or parsed
    #[error("Lookup table error: {0}")]
    LookupTable(String),

    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote store answered with a non-success status
    #[error("Download of {remote_id} failed with status {status}")]
    Status { remote_id: String, status: u16 },

    /// Remote store answered with something other than file content
    #[error("Unexpected content for {remote_id}: {reason}")]
    UnexpectedContent { remote_id: String, reason: String },

    /// Retry limit exceeded for a download
    #[error("Max retries exceeded: {operation}")]
    MaxRetriesExceeded { operation: String },

    /// Cache directory or file I/O
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(_) | FetchError::Io(_) => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for container parsing
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<glob::PatternError> for AppError {
    fn from(err: glob::PatternError) -> Self {
        AppError::Config(format!("Glob pattern error: {}", err))
    }
}

impl From<glob::GlobError> for AppError {
    fn from(err: glob::GlobError) -> Self {
        AppError::Config(format!("Glob error: {}", err))
    }
}
