//! HAWK LMS/NI test data loader
//!
//! - [`loader`] - series-aware extraction of HDF5 test files into nested mappings
//! - [`fetch`] - lookup, download and caching of remote test files
//! - [`container`] - read-only container access (HDF5 or in-memory)

pub mod cli;
pub mod config;
pub mod container;
pub mod errors;
pub mod fetch;
pub mod loader;
pub mod report;
pub mod types;

pub use errors::{AppError, AppResult, FetchError, LoaderError};
pub use loader::{dump_hdf5, load_container, load_hdf5};
pub use types::{ArrayData, Entry, LoadOptions, TestSeries, Tree};
