//! Container loaders
//!
//! [`load_hdf5`] is the series-aware entry point: it resolves the schema from
//! the file name, applies the selection filters and shapes the output per
//! series. [`dump_hdf5`] walks a whole file with no schema at all.
//!
//! Both run on any [`Container`], so the same logic serves HDF5 files and
//! in-memory containers ([`load_container`], [`dump_tree`]).

mod lms;
mod ni;
pub mod tree;

pub use tree::{dump_tree, parse_tree};

use crate::container::{dataset_units, open_container, Container};
use crate::errors::{LoaderError, LoaderResult};
use crate::types::{ArrayData, Entry, LoadOptions, TestSeries, Tree};
use std::path::Path;
use tracing::{debug, info};

/// Load the file at `path` into a nested mapping.
///
/// The series comes from the file name prefix (`LMS*`/`NI*`), falling back to
/// `opts.test_series`. The file is closed before returning, errors included.
pub fn load_hdf5(path: &Path, opts: &LoadOptions) -> LoaderResult<Tree> {
    let series = TestSeries::resolve(path, &opts.test_series)?;
    info!("Loading {} as {}", path.display(), series);
    let container = open_container(path)?;
    extract(container.as_ref(), series, opts)
}

/// Load an already open container; `file_name` drives series inference
pub fn load_container<C: Container + ?Sized>(
    container: &C,
    file_name: &Path,
    opts: &LoadOptions,
) -> LoaderResult<Tree> {
    let series = TestSeries::resolve(file_name, &opts.test_series)?;
    extract(container, series, opts)
}

/// Full attribute-preserving dump of the file at `path`
pub fn dump_hdf5(path: &Path) -> LoaderResult<Tree> {
    info!("Dumping {}", path.display());
    let container = open_container(path)?;
    dump_tree(container.as_ref())
}

fn extract<C: Container + ?Sized>(
    container: &C,
    series: TestSeries,
    opts: &LoadOptions,
) -> LoaderResult<Tree> {
    debug!(
        "Extracting {} (sensors: {:?}, data: {:?}, meta: {}, attrs: {}, compressed: {})",
        series, opts.sensors, opts.data, opts.meta, opts.attrs, opts.compress_x_axis
    );
    match series {
        TestSeries::Lms => lms::extract(container, opts),
        TestSeries::Ni => ni::extract(container, opts),
    }
}

/// Payload of a required dataset; `MissingPath` when absent
pub(crate) fn read_value<C: Container + ?Sized>(container: &C, path: &str) -> LoaderResult<ArrayData> {
    container.kind(path)?;
    container.read(path)
}

/// Required dataset as a leaf carrying its own `units` attribute
pub(crate) fn read_leaf<C: Container + ?Sized>(container: &C, path: &str) -> LoaderResult<Entry> {
    let value = read_value(container, path)?;
    Ok(Entry::with_units(value, dataset_units(container, path)?))
}

/// Every name in `filter` must be among `present`
pub(crate) fn check_filter<'a, I>(
    filter: Option<&[String]>,
    present: I,
    describe: impl Fn(&str) -> String,
) -> LoaderResult<()>
where
    I: Iterator<Item = &'a String>,
{
    let Some(filter) = filter else {
        return Ok(());
    };
    let present: Vec<&String> = present.collect();
    match filter.iter().find(|name| !present.contains(name)) {
        Some(missing) => Err(LoaderError::MissingPath(describe(missing))),
        None => Ok(()),
    }
}
