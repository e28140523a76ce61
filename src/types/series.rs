//! Test-series schema tags

use crate::errors::LoaderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Datasets/groups under an LMS sensor that carry sensor metadata, not measurements
pub const LMS_ATTR_FIELDS: [&str; 5] = ["assettNumber", "calibration", "location", "model", "sensor"];

/// LMS top-level metadata group
pub const LMS_META_GROUP: &str = "Meta";

/// NI top-level metadata node (attributes only)
pub const NI_META_NODE: &str = "meta";

/// Key under which metadata appears in every output mapping
pub const META_KEY: &str = "Meta";

/// Test campaign schema variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TestSeries {
    /// Frequency-domain modal campaign (`X_data`/`Y_data` pairs)
    #[serde(rename = "LMS")]
    Lms,
    /// Time-series campaign (`Measurement`/`Timestamp` pairs)
    #[serde(rename = "NI")]
    Ni,
}

impl TestSeries {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestSeries::Lms => "LMS",
            TestSeries::Ni => "NI",
        }
    }

    /// Series implied by a file name prefix, if any
    pub fn from_file_name(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.starts_with("LMS") {
            Some(TestSeries::Lms)
        } else if name.starts_with("NI") {
            Some(TestSeries::Ni)
        } else {
            None
        }
    }

    /// File name prefix wins; `fallback` applies only to names matching neither prefix
    pub fn resolve(path: &Path, fallback: &str) -> Result<Self, LoaderError> {
        match Self::from_file_name(path) {
            Some(series) => Ok(series),
            None => fallback.parse(),
        }
    }

    /// Whether `name` is a recognised attribute field for this series
    pub fn is_attr_field(&self, name: &str) -> bool {
        match self {
            TestSeries::Lms => LMS_ATTR_FIELDS.contains(&name),
            TestSeries::Ni => false,
        }
    }
}

impl fmt::Display for TestSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestSeries {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LMS" => Ok(TestSeries::Lms),
            "NI" => Ok(TestSeries::Ni),
            other => Err(LoaderError::UnsupportedSchema(other.to_string())),
        }
    }
}
