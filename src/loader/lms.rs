//! LMS (frequency-domain) extraction
//!
//! Layout: `/Meta/...`, `/<sensor>/<attr field>`, `/<sensor>/<field>/{X_data,Y_data}`.

use super::tree::parse_tree;
use super::{check_filter, read_leaf};
use crate::container::{join, Container, NodeKind};
use crate::errors::LoaderResult;
use crate::types::series::LMS_META_GROUP;
use crate::types::{group_mut, Entry, LoadOptions, TestSeries, Tree};
use std::collections::BTreeSet;
use tracing::debug;

const X_DATA: &str = "X_data";
const Y_DATA: &str = "Y_data";

pub(crate) fn extract<C: Container + ?Sized>(container: &C, opts: &LoadOptions) -> LoaderResult<Tree> {
    let mut out = Tree::new();
    let top_level = container.member_names("/")?;
    let mut sensor_names = Vec::new();
    let mut seen_fields = BTreeSet::new();

    for name in &top_level {
        let path = join("/", name);
        if name == LMS_META_GROUP {
            if opts.meta {
                out.extend(parse_tree(container, &path)?);
            }
            continue;
        }
        sensor_names.push(name.clone());
        if !opts.sensor_selected(name) {
            continue;
        }
        if container.kind(&path)? == NodeKind::Dataset {
            out.extend(parse_tree(container, &path)?);
            continue;
        }

        let mut sensor = Tree::new();
        for field in container.member_names(&path)? {
            let field_path = join(&path, &field);
            if TestSeries::Lms.is_attr_field(&field) {
                if opts.attrs {
                    sensor.extend(parse_tree(container, &field_path)?);
                }
                continue;
            }
            seen_fields.insert(field.clone());
            if !opts.field_selected(&field) {
                continue;
            }

            let mut pair = Tree::new();
            if opts.compress_x_axis {
                let shared = group_mut(&mut out, X_DATA);
                if !shared.contains_key(&field) {
                    debug!("Capturing shared {} for field {} from {}", X_DATA, field, name);
                    shared.insert(field.clone(), read_leaf(container, &join(&field_path, X_DATA))?);
                }
            } else {
                pair.insert(X_DATA.to_string(), read_leaf(container, &join(&field_path, X_DATA))?);
            }
            pair.insert(Y_DATA.to_string(), read_leaf(container, &join(&field_path, Y_DATA))?);
            sensor.insert(field, Entry::Group(pair));
        }
        out.insert(name.clone(), Entry::Group(sensor));
    }

    check_filter(opts.sensors.as_deref(), sensor_names.iter(), |n| format!("/{}", n))?;
    check_filter(opts.data.as_deref(), seen_fields.iter(), |n| format!("/<sensor>/{}", n))?;
    Ok(out)
}
