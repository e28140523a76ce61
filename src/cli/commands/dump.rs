use super::OutputArgs;
use crate::errors::AppResult;
use crate::loader::dump_hdf5;
use crate::report::{emit, OutputFormat, ReportFormatter};
use clap::Args;
use std::path::PathBuf;

/// Dump a whole file with every attribute, no schema applied
#[derive(Args)]
pub struct DumpCommand {
    /// HDF5 file to dump
    path: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

impl DumpCommand {
    pub fn run(&self) -> AppResult<()> {
        let format: OutputFormat = self.output.format.parse()?;
        let tree = dump_hdf5(&self.path)?;
        let name = super::load::display_key(&self.path);
        let content = ReportFormatter::format_tree(&name, &tree, format)?;
        emit(&content, self.output.output.as_deref())
    }
}
