//! NI (time-series) extraction
//!
//! Layout: `/meta` (attributes only), `/<sensor>/{Measurement,Timestamp}` with the
//! measurement unit stored as the sensor group's `Units` attribute.

use super::{check_filter, read_value};
use crate::container::{join, text_attr, Container};
use crate::errors::LoaderResult;
use crate::types::series::NI_META_NODE;
use crate::types::{Entry, LoadOptions, Tree, META_KEY};
use tracing::{debug, warn};

const MEASUREMENT: &str = "Measurement";
const TIMESTAMP: &str = "Timestamp";
const SENSOR_UNITS_ATTR: &str = "Units";
const TIMESTAMP_UNITS: &str = "s";

pub(crate) fn extract<C: Container + ?Sized>(container: &C, opts: &LoadOptions) -> LoaderResult<Tree> {
    if opts.data.is_some() {
        warn!(
            "Ignoring data field filter: NI files only hold the {}/{} pair, which is always loaded",
            MEASUREMENT, TIMESTAMP
        );
    }

    let mut out = Tree::new();
    let top_level = container.member_names("/")?;
    let mut sensor_names = Vec::new();
    let mut timestamp_captured = false;

    for name in &top_level {
        let path = join("/", name);
        if name == NI_META_NODE {
            if opts.meta {
                out.insert(META_KEY.to_string(), Entry::Group(flatten_attrs(container, &path)?));
            }
            continue;
        }
        sensor_names.push(name.clone());
        if !opts.sensor_selected(name) {
            continue;
        }

        let measurement = read_value(container, &join(&path, MEASUREMENT))?;
        let units = text_attr(container, &path, SENSOR_UNITS_ATTR)?;

        let mut sensor = Tree::new();
        sensor.insert(MEASUREMENT.to_string(), Entry::with_units(measurement, units));
        if opts.compress_x_axis {
            if !timestamp_captured {
                debug!("Capturing shared {} from {}", TIMESTAMP, name);
                out.insert(TIMESTAMP.to_string(), read_timestamp(container, &path)?);
                timestamp_captured = true;
            }
        } else {
            sensor.insert(TIMESTAMP.to_string(), read_timestamp(container, &path)?);
        }
        out.insert(name.clone(), Entry::Group(sensor));
    }

    check_filter(opts.sensors.as_deref(), sensor_names.iter(), |n| format!("/{}", n))?;
    Ok(out)
}

fn read_timestamp<C: Container + ?Sized>(container: &C, sensor_path: &str) -> LoaderResult<Entry> {
    let value = read_value(container, &join(sensor_path, TIMESTAMP))?;
    Ok(Entry::with_units(value, Some(TIMESTAMP_UNITS.to_string())))
}

/// Attribute name -> value mapping of the node at `path`
fn flatten_attrs<C: Container + ?Sized>(container: &C, path: &str) -> LoaderResult<Tree> {
    let mut meta = Tree::new();
    for attr in container.attr_names(path)? {
        if let Some(value) = container.attr(path, &attr)? {
            meta.insert(attr, Entry::Array(value));
        }
    }
    Ok(meta)
}
