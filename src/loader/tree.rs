//! Structural unfold of container subtrees

use crate::container::{base_name, dataset_units, join, Container, NodeKind};
use crate::errors::LoaderResult;
use crate::types::{Entry, Tree};

/// Materialise the node at `path` as `{name: ...}`.
///
/// Datasets become bare arrays, or `{value, units}` when they carry a text
/// `units` attribute. Groups become the merge of their parsed children; a
/// later child replaces an earlier one with the same name.
pub fn parse_tree<C: Container + ?Sized>(container: &C, path: &str) -> LoaderResult<Tree> {
    let name = base_name(path).to_string();
    let mut out = Tree::new();
    match container.kind(path)? {
        NodeKind::Dataset => {
            let value = container.read(path)?;
            let units = dataset_units(container, path)?;
            out.insert(name, Entry::with_units(value, units));
        }
        NodeKind::Group => {
            let mut merged = Tree::new();
            for child in container.member_names(path)? {
                merged.extend(parse_tree(container, &join(path, &child))?);
            }
            out.insert(name, Entry::Group(merged));
        }
    }
    Ok(out)
}

/// Materialise the whole container with every attribute.
///
/// Datasets without attributes become bare arrays; datasets with attributes
/// become a mapping holding `value` plus one entry per attribute.
pub fn dump_tree<C: Container + ?Sized>(container: &C) -> LoaderResult<Tree> {
    dump_group(container, "/")
}

fn dump_group<C: Container + ?Sized>(container: &C, path: &str) -> LoaderResult<Tree> {
    let mut out = Tree::new();
    for child in container.member_names(path)? {
        let child_path = join(path, &child);
        let entry = match container.kind(&child_path)? {
            NodeKind::Group => Entry::Group(dump_group(container, &child_path)?),
            NodeKind::Dataset => dump_dataset(container, &child_path)?,
        };
        out.insert(child, entry);
    }
    Ok(out)
}

fn dump_dataset<C: Container + ?Sized>(container: &C, path: &str) -> LoaderResult<Entry> {
    let value = container.read(path)?;
    let attr_names = container.attr_names(path)?;
    if attr_names.is_empty() {
        return Ok(Entry::Array(value));
    }
    let mut record = Tree::new();
    record.insert("value".to_string(), Entry::Array(value));
    for name in attr_names {
        if let Some(attr) = container.attr(path, &name)? {
            record.insert(name, Entry::Array(attr));
        }
    }
    Ok(Entry::Group(record))
}
