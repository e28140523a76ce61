//! Output mapping produced by the loaders

use super::array::ArrayData;
use serde::Serialize;
use std::collections::BTreeMap;

/// Nested name -> entry mapping
pub type Tree = BTreeMap<String, Entry>;

/// A value paired with its unit label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Labeled {
    pub value: ArrayData,
    pub units: String,
}

/// One node of the output mapping
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    /// Bare array from a dataset without a unit attribute
    Array(ArrayData),
    /// `{value, units}` record
    Labeled(Labeled),
    /// Nested mapping for a group
    Group(Tree),
}

impl Entry {
    /// Labeled form when units are known, bare array otherwise
    pub fn with_units(value: ArrayData, units: Option<String>) -> Self {
        match units {
            Some(units) => Entry::Labeled(Labeled { value, units }),
            None => Entry::Array(value),
        }
    }

    /// The array payload of a leaf, labeled or not
    pub fn value(&self) -> Option<&ArrayData> {
        match self {
            Entry::Array(value) => Some(value),
            Entry::Labeled(labeled) => Some(&labeled.value),
            Entry::Group(_) => None,
        }
    }

    pub fn units(&self) -> Option<&str> {
        match self {
            Entry::Labeled(labeled) => Some(&labeled.units),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Tree> {
        match self {
            Entry::Group(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn is_labeled(&self) -> bool {
        matches!(self, Entry::Labeled(_))
    }

    /// Number of leaf arrays below (and including) this entry
    pub fn leaf_count(&self) -> usize {
        match self {
            Entry::Group(tree) => tree.values().map(Entry::leaf_count).sum(),
            _ => 1,
        }
    }
}

/// Follow `path` through nested groups
pub fn get_path<'a>(tree: &'a Tree, path: &[&str]) -> Option<&'a Entry> {
    let (first, rest) = path.split_first()?;
    let entry = tree.get(*first)?;
    if rest.is_empty() {
        Some(entry)
    } else {
        get_path(entry.as_group()?, rest)
    }
}

/// Get or create the group named `name` inside `tree`.
/// A non-group entry under that name is replaced.
pub fn group_mut<'a>(tree: &'a mut Tree, name: &str) -> &'a mut Tree {
    let entry = tree
        .entry(name.to_string())
        .or_insert_with(|| Entry::Group(Tree::new()));
    if !matches!(entry, Entry::Group(_)) {
        *entry = Entry::Group(Tree::new());
    }
    match entry {
        Entry::Group(tree) => tree,
        _ => unreachable!("entry was just made a group"),
    }
}
