//! Core data types shared by the loaders, the fetch orchestrator and the CLI

pub mod array;
pub mod options;
pub mod output;
pub mod series;

pub use array::ArrayData;
pub use options::LoadOptions;
pub use output::{get_path, group_mut, Entry, Labeled, Tree};
pub use series::{TestSeries, LMS_ATTR_FIELDS, META_KEY};
