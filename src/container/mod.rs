//! Read-only access to hierarchical containers
//!
//! Nodes are addressed by slash-delimited paths from the root (`"/"`).
//! Two implementations are provided:
//! - **MemoryContainer** - in-process tree, built programmatically
//! - **Hdf5Container** - HDF5 files via the `hdf5` crate (feature `hdf5`)

pub mod memory;

#[cfg(feature = "hdf5")]
pub mod hdf5;

pub use memory::MemoryContainer;

#[cfg(feature = "hdf5")]
pub use self::hdf5::Hdf5Container;

use crate::errors::{LoaderError, LoaderResult};
use crate::types::ArrayData;
use std::path::Path;

/// Node classification within a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Dataset,
}

/// Read-only hierarchical store of groups and datasets
pub trait Container {
    /// Kind of the node at `path`; `MissingPath` when absent
    fn kind(&self, path: &str) -> LoaderResult<NodeKind>;

    /// Child names of the group at `path`, in name order
    fn member_names(&self, path: &str) -> LoaderResult<Vec<String>>;

    /// Full payload of the dataset at `path`
    fn read(&self, path: &str) -> LoaderResult<ArrayData>;

    /// Attribute names on the node at `path`
    fn attr_names(&self, path: &str) -> LoaderResult<Vec<String>>;

    /// Attribute `name` on the node at `path`, if present
    fn attr(&self, path: &str, name: &str) -> LoaderResult<Option<ArrayData>>;

    fn exists(&self, path: &str) -> bool {
        self.kind(path).is_ok()
    }
}

/// Open the container stored at `path`.
///
/// The handle is released when the returned box is dropped.
#[cfg(feature = "hdf5")]
pub fn open_container(path: &Path) -> LoaderResult<Box<dyn Container>> {
    Ok(Box::new(Hdf5Container::open(path)?))
}

/// Open the container stored at `path`.
///
/// Without the `hdf5` feature no file backend is available.
#[cfg(not(feature = "hdf5"))]
pub fn open_container(path: &Path) -> LoaderResult<Box<dyn Container>> {
    tracing::debug!("Cannot open {}: HDF5 backend not compiled", path.display());
    Err(LoaderError::BackendUnavailable)
}

/// Normalise to a rooted path without a trailing slash (`"/"` for the root)
pub fn normalize(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    format!("/{}", parts.join("/"))
}

/// Path of `child` inside `parent`
pub fn join(parent: &str, child: &str) -> String {
    let parent = normalize(parent);
    if parent == "/" {
        format!("/{}", child)
    } else {
        format!("{}/{}", parent, child)
    }
}

/// Last component of `path` (empty for the root)
pub fn base_name(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

/// Split into (parent, name); the root has no parent
pub fn split_parent(path: &str) -> Option<(String, String)> {
    let path = normalize(path);
    if path == "/" {
        return None;
    }
    let idx = path.rfind('/')?;
    let parent = if idx == 0 { "/" } else { &path[..idx] };
    Some((parent.to_string(), path[idx + 1..].to_string()))
}

/// Text value of the `units` attribute of a dataset.
///
/// Absent, unreadable or non-text unit attributes yield `None`.
pub fn dataset_units<C: Container + ?Sized>(container: &C, path: &str) -> LoaderResult<Option<String>> {
    text_attr(container, path, "units")
}

/// Text value of attribute `name`, `None` when absent, unreadable or not text
pub fn text_attr<C: Container + ?Sized>(
    container: &C,
    path: &str,
    name: &str,
) -> LoaderResult<Option<String>> {
    let value = match container.attr(path, name) {
        Ok(value) => value,
        Err(LoaderError::ContainerAccess { path: node, message }) => {
            tracing::warn!("Ignoring unreadable attribute {} on {}: {}", name, node, message);
            None
        }
        Err(e) => return Err(e),
    };
    Ok(value.and_then(|value| value.as_text().map(str::to_string)))
}
