use crate::common::{ni_container, NI_SENSORS};
use hawk_loader::loader::load_container;
use hawk_loader::types::{get_path, ArrayData, Entry, LoadOptions, META_KEY};
use std::path::Path;

const FILE: &str = "NI_DS_TLE_3_5.hd5";

#[test]
fn test_meta_flattened() {
    let out = load_container(&ni_container(), Path::new(FILE), &LoadOptions::default()).unwrap();
    let meta = out[META_KEY].as_group().unwrap();
    assert_eq!(meta.keys().collect::<Vec<_>>(), vec!["operator", "sample_rate"]);
    assert_eq!(meta["operator"], Entry::Array(ArrayData::from("MB")));
    assert!(!out.contains_key("meta"));
}

#[test]
fn test_measurement_units_from_sensor_group() {
    let out = load_container(&ni_container(), Path::new(FILE), &LoadOptions::default()).unwrap();
    let a1 = get_path(&out, &["A1", "Measurement"]).unwrap();
    assert_eq!(a1.units(), Some("m/s^2"));
    // The dataset's own "units" attribute is never used
    let a3 = get_path(&out, &["A3", "Measurement"]).unwrap();
    assert!(!a3.is_labeled());
    for sensor in NI_SENSORS {
        assert_eq!(get_path(&out, &[sensor, "Timestamp"]).unwrap().units(), Some("s"));
    }
}

#[test]
fn test_data_filter_ignored() {
    let plain = load_container(&ni_container(), Path::new(FILE), &LoadOptions::default()).unwrap();
    let opts = LoadOptions::default().with_data(["Whatever"]);
    let filtered = load_container(&ni_container(), Path::new(FILE), &opts).unwrap();
    assert_eq!(plain, filtered);
}

#[test]
fn test_compressed_timestamp() {
    let opts = LoadOptions::default().compressed(true);
    let out = load_container(&ni_container(), Path::new(FILE), &opts).unwrap();
    assert_eq!(out["Timestamp"].units(), Some("s"));
    for sensor in NI_SENSORS {
        let group = out[sensor].as_group().unwrap();
        assert_eq!(group.keys().collect::<Vec<_>>(), vec!["Measurement"]);
    }
}

#[test]
fn test_sensor_filter() {
    let opts = LoadOptions::default().with_sensors(["A2"]).with_meta(false);
    let out = load_container(&ni_container(), Path::new(FILE), &opts).unwrap();
    assert_eq!(out.keys().collect::<Vec<_>>(), vec!["A2"]);
}
