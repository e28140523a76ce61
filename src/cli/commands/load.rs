use super::{LoadArgs, OutputArgs};
use crate::errors::{AppError, AppResult};
use crate::loader::load_hdf5;
use crate::report::{emit, OutputFormat, ReportFormatter};
use crate::types::Tree;
use clap::Args;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load HAWK test files into nested mappings
#[derive(Args)]
pub struct LoadCommand {
    /// Files or glob patterns (e.g. "data/LMS_BR_AR_*.hd5")
    #[arg(required = true)]
    inputs: Vec<String>,

    #[command(flatten)]
    load: LoadArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl LoadCommand {
    pub fn run(&self) -> AppResult<()> {
        let format: OutputFormat = self.output.format.parse()?;
        let files = expand_inputs(&self.inputs)?;
        let opts = self.load.to_options();
        info!("Loading {} files", files.len());

        let mut batch: BTreeMap<String, Tree> = BTreeMap::new();
        for file in &files {
            batch.insert(display_key(file), load_hdf5(file, &opts)?);
        }

        let content = ReportFormatter::format_batch(&batch, format)?;
        emit(&content, self.output.output.as_deref())
    }
}

/// Expand glob patterns; plain paths pass through unchanged
pub fn expand_inputs(inputs: &[String]) -> AppResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.contains(['*', '?', '[']) {
            files.push(PathBuf::from(input));
            continue;
        }
        let before = files.len();
        for entry in glob::glob(input)? {
            files.push(entry?);
        }
        if files.len() == before {
            return Err(AppError::Config(format!("No files match pattern: {}", input)));
        }
    }
    Ok(files)
}

/// Result key for a file: its stem
pub fn display_key(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
