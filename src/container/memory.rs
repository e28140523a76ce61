//! In-memory container
//!
//! Holds a full group/dataset tree in process memory. Used to assemble
//! containers programmatically (fixtures, conversions) and read them through
//! the same `Container` interface as files.

use super::{normalize, split_parent, Container, NodeKind};
use crate::errors::{LoaderError, LoaderResult};
use crate::types::ArrayData;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
enum MemNode {
    Group { children: BTreeSet<String> },
    Dataset { data: ArrayData },
}

#[derive(Debug, Clone)]
struct MemEntry {
    node: MemNode,
    attrs: BTreeMap<String, ArrayData>,
}

impl MemEntry {
    fn group() -> Self {
        Self {
            node: MemNode::Group {
                children: BTreeSet::new(),
            },
            attrs: BTreeMap::new(),
        }
    }
}

/// Container backed by an in-process tree
#[derive(Debug, Clone)]
pub struct MemoryContainer {
    nodes: BTreeMap<String, MemEntry>,
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryContainer {
    /// Create a container holding only the root group
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), MemEntry::group());
        Self { nodes }
    }

    /// Create the group at `path`, including missing parents
    pub fn add_group(&mut self, path: &str) -> LoaderResult<&mut Self> {
        let path = normalize(path);
        match self.nodes.get(&path).map(|e| &e.node) {
            Some(MemNode::Group { .. }) => return Ok(self),
            Some(MemNode::Dataset { .. }) => {
                return Err(LoaderError::access(path, "a dataset already exists here"))
            }
            None => {}
        }
        if let Some((parent, name)) = split_parent(&path) {
            self.add_group(&parent)?;
            self.link(&parent, name);
        }
        self.nodes.insert(path, MemEntry::group());
        Ok(self)
    }

    /// Create or replace the dataset at `path`, including missing parent groups
    pub fn add_dataset(&mut self, path: &str, data: impl Into<ArrayData>) -> LoaderResult<&mut Self> {
        let path = normalize(path);
        let (parent, name) = split_parent(&path)
            .ok_or_else(|| LoaderError::access("/", "the root cannot be a dataset"))?;
        if let Some(MemEntry {
            node: MemNode::Group { .. },
            ..
        }) = self.nodes.get(&path)
        {
            return Err(LoaderError::access(path, "a group already exists here"));
        }
        self.add_group(&parent)?;
        self.link(&parent, name);
        self.nodes.insert(
            path,
            MemEntry {
                node: MemNode::Dataset { data: data.into() },
                attrs: BTreeMap::new(),
            },
        );
        Ok(self)
    }

    /// Set attribute `name` on the existing node at `path`
    pub fn set_attr(
        &mut self,
        path: &str,
        name: &str,
        value: impl Into<ArrayData>,
    ) -> LoaderResult<&mut Self> {
        let path = normalize(path);
        let entry = self
            .nodes
            .get_mut(&path)
            .ok_or_else(|| LoaderError::MissingPath(path.clone()))?;
        entry.attrs.insert(name.to_string(), value.into());
        Ok(self)
    }

    /// Number of groups and datasets, the root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn link(&mut self, parent: &str, name: String) {
        if let Some(MemEntry {
            node: MemNode::Group { children },
            ..
        }) = self.nodes.get_mut(parent)
        {
            children.insert(name);
        }
    }

    fn entry(&self, path: &str) -> LoaderResult<&MemEntry> {
        let path = normalize(path);
        self.nodes
            .get(&path)
            .ok_or(LoaderError::MissingPath(path))
    }
}

impl Container for MemoryContainer {
    fn kind(&self, path: &str) -> LoaderResult<NodeKind> {
        Ok(match self.entry(path)?.node {
            MemNode::Group { .. } => NodeKind::Group,
            MemNode::Dataset { .. } => NodeKind::Dataset,
        })
    }

    fn member_names(&self, path: &str) -> LoaderResult<Vec<String>> {
        match &self.entry(path)?.node {
            MemNode::Group { children } => Ok(children.iter().cloned().collect()),
            MemNode::Dataset { .. } => Err(LoaderError::access(normalize(path), "not a group")),
        }
    }

    fn read(&self, path: &str) -> LoaderResult<ArrayData> {
        match &self.entry(path)?.node {
            MemNode::Dataset { data } => Ok(data.clone()),
            MemNode::Group { .. } => Err(LoaderError::access(normalize(path), "not a dataset")),
        }
    }

    fn attr_names(&self, path: &str) -> LoaderResult<Vec<String>> {
        Ok(self.entry(path)?.attrs.keys().cloned().collect())
    }

    fn attr(&self, path: &str, name: &str) -> LoaderResult<Option<ArrayData>> {
        Ok(self.entry(path)?.attrs.get(name).cloned())
    }
}
