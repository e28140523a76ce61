//! Subcommand implementations

pub mod dump;
pub mod fetch;
pub mod keys;
pub mod load;

use crate::types::LoadOptions;
use clap::Args;

/// Selection and shaping flags shared by `load` and `fetch`
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Test series used when a file name starts with neither LMS nor NI
    #[arg(long, default_value = "LMS")]
    pub series: String,

    /// Only load these sensors (repeatable)
    #[arg(long = "sensor")]
    pub sensors: Vec<String>,

    /// Only load these data fields, LMS only (repeatable)
    #[arg(long = "field")]
    pub fields: Vec<String>,

    /// Leave out the Meta entry
    #[arg(long)]
    pub no_meta: bool,

    /// Leave out sensor attribute fields
    #[arg(long)]
    pub no_attrs: bool,

    /// Hoist the shared X_data/Timestamp axis to the top level
    #[arg(long)]
    pub compress_x_axis: bool,
}

impl LoadArgs {
    pub fn to_options(&self) -> LoadOptions {
        let mut opts = LoadOptions::default()
            .with_series(self.series.clone())
            .with_meta(!self.no_meta)
            .with_attrs(!self.no_attrs)
            .compressed(self.compress_x_axis);
        if !self.sensors.is_empty() {
            opts = opts.with_sensors(self.sensors.iter().cloned());
        }
        if !self.fields.is_empty() {
            opts = opts.with_data(self.fields.iter().cloned());
        }
        opts
    }
}

/// Output destination flags
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format (console or json)
    #[arg(long, default_value = "console")]
    pub format: String,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(long)]
    pub output: Option<std::path::PathBuf>,
}
